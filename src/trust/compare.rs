use super::snapshot::PositionMap;

// Changed means: no previous generation, differing cardinality, a node id
// new to the layout, or any exactly unequal coordinate (no epsilon).
pub fn positions_changed(previous: Option<&PositionMap>, new: &PositionMap) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    if previous.is_empty() {
        return true;
    }
    if previous.len() != new.len() {
        return true;
    }

    for (id, new_pos) in new {
        match previous.get(id) {
            None => return true,
            Some(old_pos) if old_pos != new_pos => return true,
            Some(_) => {}
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(entries: &[(&str, (f64, f64))]) -> PositionMap {
        entries
            .iter()
            .map(|(id, pos)| ((*id).to_owned(), *pos))
            .collect()
    }

    #[test]
    fn absent_previous_is_always_changed() {
        assert!(positions_changed(None, &positions(&[("a", (0.0, 0.0))])));
        assert!(positions_changed(
            Some(&PositionMap::new()),
            &positions(&[("a", (0.0, 0.0))])
        ));
    }

    #[test]
    fn identical_maps_are_unchanged() {
        let map = positions(&[("a", (0.1, 0.2)), ("b", (0.3, 0.4))]);
        assert!(!positions_changed(Some(&map), &map.clone()));
    }

    #[test]
    fn single_coordinate_difference_flips_to_changed() {
        let old = positions(&[("a", (0.1, 0.2)), ("b", (0.3, 0.4))]);
        let new = positions(&[("a", (0.1, 0.2)), ("b", (0.3, 0.4000001))]);
        assert!(positions_changed(Some(&old), &new));
    }

    #[test]
    fn membership_and_cardinality_differences_are_changed() {
        let old = positions(&[("a", (0.1, 0.2))]);
        assert!(positions_changed(
            Some(&old),
            &positions(&[("a", (0.1, 0.2)), ("b", (0.3, 0.4))])
        ));
        assert!(positions_changed(Some(&old), &positions(&[("b", (0.1, 0.2))])));
    }
}
