//! Attribute-map diff.

use vtree_types::Props;

use crate::patch::PropOp;

/// Compare two attribute maps.
///
/// Keys are visited new-then-old, each side in key order. A key missing
/// from `new` yields `REMOVE_PROP`; a key that is new or whose value
/// changed yields `SET_PROP`; an unchanged key yields nothing.
pub fn diff_props(old: &Props, new: &Props) -> Vec<PropOp> {
    let mut ops = Vec::new();

    for (key, value) in new {
        if old.get(key) != Some(value) {
            ops.push(PropOp::SetProp {
                key: key.clone(),
                value: value.clone(),
            });
        }
    }

    for key in old.keys() {
        if !new.contains_key(key) {
            ops.push(PropOp::RemoveProp { key: key.clone() });
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtree_types::{props, PropValue};

    #[test]
    fn set_and_remove_without_touching_unchanged() {
        let old = props([("a", 1), ("b", 2)]);
        let new = props([("a", 1), ("c", 3)]);

        let ops = diff_props(&old, &new);
        assert_eq!(ops.len(), 2);
        assert!(ops.contains(&PropOp::RemoveProp { key: "b".into() }));
        assert!(ops.contains(&PropOp::SetProp {
            key: "c".into(),
            value: PropValue::Int(3)
        }));
    }

    #[test]
    fn changed_value_is_set() {
        let ops = diff_props(&props([("class", "a")]), &props([("class", "b")]));
        assert_eq!(
            ops,
            vec![PropOp::SetProp {
                key: "class".into(),
                value: PropValue::from("b")
            }]
        );
    }

    #[test]
    fn type_change_counts_as_change() {
        let ops = diff_props(&props([("n", 1)]), &props([("n", "1")]));
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn identical_maps_yield_nothing() {
        let p = props([("id", PropValue::from("x")), ("hidden", true.into())]);
        assert!(diff_props(&p, &p).is_empty());
        assert!(diff_props(&Props::new(), &Props::new()).is_empty());
    }

    #[test]
    fn nan_value_is_unchanged() {
        let p = props([("w", f64::NAN)]);
        assert!(diff_props(&p, &p).is_empty());
        assert_eq!(diff_props(&props([("w", 0.0)]), &props([("w", -0.0)])).len(), 1);
    }

    #[test]
    fn sets_come_before_removes() {
        let ops = diff_props(&props([("z", 1)]), &props([("a", 1)]));
        assert!(matches!(ops[0], PropOp::SetProp { .. }));
        assert!(matches!(ops[1], PropOp::RemoveProp { .. }));
    }
}
