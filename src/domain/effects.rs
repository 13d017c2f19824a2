use std::time::Duration;

/// Cards that get hover and entrance effects on the landing page.
pub const CARD_SELECTOR: &str = ".contact-card, .welcome-card, .nav-card, .product-card";

/// Inline style values applied to a card at one point of an effect.
/// `None` leaves the property untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleFrame {
    pub opacity: Option<&'static str>,
    pub transform: &'static str,
    pub transition: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverPhase {
    Enter,
    Leave,
}

impl HoverPhase {
    pub fn frame(self) -> StyleFrame {
        match self {
            HoverPhase::Enter => StyleFrame {
                opacity: None,
                transform: "translateY(-5px)",
                transition: Some("transform 0.3s ease"),
            },
            HoverPhase::Leave => StyleFrame {
                opacity: None,
                transform: "translateY(0)",
                transition: None,
            },
        }
    }
}

/// Entrance animation for one card: `hidden` immediately, `shown` after
/// `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntranceStep {
    pub index: usize,
    pub delay: Duration,
    pub hidden: StyleFrame,
    pub shown: StyleFrame,
}

pub const ENTRANCE_HIDDEN: StyleFrame = StyleFrame {
    opacity: Some("0"),
    transform: "translateY(20px)",
    transition: None,
};

pub const ENTRANCE_SHOWN: StyleFrame = StyleFrame {
    opacity: Some("1"),
    transform: "translateY(0)",
    transition: Some("opacity 0.5s ease, transform 0.5s ease"),
};

/// Staggered entrance: card `i` starts `i * step` after the first.
pub fn entrance_plan(card_count: usize, step: Duration) -> Vec<EntranceStep> {
    (0..card_count)
        .map(|index| EntranceStep {
            index,
            delay: step * index as u32,
            hidden: ENTRANCE_HIDDEN,
            shown: ENTRANCE_SHOWN,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_grow_by_constant_step() {
        let plan = entrance_plan(4, Duration::from_millis(100));
        let delays: Vec<u128> = plan.iter().map(|s| s.delay.as_millis()).collect();
        assert_eq!(delays, vec![0, 100, 200, 300]);
        assert!(plan.iter().all(|s| s.hidden == ENTRANCE_HIDDEN && s.shown == ENTRANCE_SHOWN));
    }

    #[test]
    fn test_empty_page_has_no_steps() {
        assert!(entrance_plan(0, Duration::from_millis(100)).is_empty());
    }

    #[test]
    fn test_hover_frames() {
        assert_eq!(HoverPhase::Enter.frame().transform, "translateY(-5px)");
        assert_eq!(HoverPhase::Leave.frame().transform, "translateY(0)");
        assert!(HoverPhase::Leave.frame().transition.is_none());
    }
}
