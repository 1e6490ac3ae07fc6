//! Critical geometry as data. The resilience loop re-applies these property
//! sets wholesale, so any externally mutated property is restored within one
//! interval; keeping them as plain data keeps that property testable off the
//! browser.

pub const TOGGLE_SIZE_PX: u32 = 56;
pub const EDGE_OFFSET_PX: u32 = 24;
pub const PANEL_WIDTH_PX: u32 = 360;
pub const PANEL_HEIGHT_PX: u32 = 520;

/// One step below the 32-bit maximum, above anything a host page plausibly
/// uses.
pub const WIDGET_Z_INDEX: &str = "2147483000";

/// Structural geometry of the floating toggle control. Every property a host
/// script could rewrite to displace or hide the control is listed here.
pub fn toggle_geometry() -> Vec<(&'static str, String)> {
    vec![
        ("position", "fixed".to_string()),
        ("bottom", format!("{EDGE_OFFSET_PX}px")),
        ("right", format!("{EDGE_OFFSET_PX}px")),
        ("width", format!("{TOGGLE_SIZE_PX}px")),
        ("height", format!("{TOGGLE_SIZE_PX}px")),
        ("margin", "0".to_string()),
        ("border-radius", "50%".to_string()),
        ("z-index", WIDGET_Z_INDEX.to_string()),
        ("display", "block".to_string()),
        ("visibility", "visible".to_string()),
        ("opacity", "1".to_string()),
    ]
}

/// Structural geometry of the conversation panel. Visibility is the open
/// sub-state; everything else is fixed.
pub fn panel_geometry(open: bool) -> Vec<(&'static str, String)> {
    vec![
        ("position", "fixed".to_string()),
        (
            "bottom",
            format!("{}px", EDGE_OFFSET_PX + TOGGLE_SIZE_PX + 16),
        ),
        ("right", format!("{EDGE_OFFSET_PX}px")),
        ("width", format!("{PANEL_WIDTH_PX}px")),
        ("max-width", "calc(100vw - 32px)".to_string()),
        ("height", format!("{PANEL_HEIGHT_PX}px")),
        ("max-height", "calc(100vh - 120px)".to_string()),
        ("z-index", WIDGET_Z_INDEX.to_string()),
        ("display", if open { "flex" } else { "none" }.to_string()),
        ("flex-direction", "column".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of<'a>(rules: &'a [(&'static str, String)], property: &str) -> Option<&'a str> {
        rules
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn toggle_geometry_pins_position_and_stacking() {
        let rules = toggle_geometry();
        assert_eq!(value_of(&rules, "position"), Some("fixed"));
        assert_eq!(value_of(&rules, "bottom"), Some("24px"));
        assert_eq!(value_of(&rules, "right"), Some("24px"));
        assert_eq!(value_of(&rules, "z-index"), Some(WIDGET_Z_INDEX));
    }

    #[test]
    fn toggle_geometry_restores_visibility() {
        // A host script hiding the control must be undone by re-assertion,
        // so the set has to pin display, visibility, and opacity.
        let rules = toggle_geometry();
        assert_eq!(value_of(&rules, "display"), Some("block"));
        assert_eq!(value_of(&rules, "visibility"), Some("visible"));
        assert_eq!(value_of(&rules, "opacity"), Some("1"));
    }

    #[test]
    fn geometry_sets_are_total_and_constant() {
        // Re-applying the same set twice must be a fixpoint: identical
        // properties, identical values, independent of call order.
        assert_eq!(toggle_geometry(), toggle_geometry());
        assert_eq!(panel_geometry(true), panel_geometry(true));
    }

    #[test]
    fn panel_visibility_is_the_only_open_dependent_property() {
        let open = panel_geometry(true);
        let closed = panel_geometry(false);
        assert_eq!(open.len(), closed.len());

        let differing: Vec<&str> = open
            .iter()
            .zip(closed.iter())
            .filter(|(a, b)| a != b)
            .map(|((name, _), _)| *name)
            .collect();
        assert_eq!(differing, vec!["display"]);
        assert_eq!(value_of(&open, "display"), Some("flex"));
        assert_eq!(value_of(&closed, "display"), Some("none"));
    }

    #[test]
    fn panel_sits_above_the_toggle() {
        let rules = panel_geometry(true);
        assert_eq!(value_of(&rules, "bottom"), Some("96px"));
    }
}
