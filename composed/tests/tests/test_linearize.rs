use composed::source::MapEnv;
use composed::{ComposeError, Composition, MixinDef};

/////////////////////////////////////////////////////////////////////////////////////////

fn order(comp: &Composition) -> Vec<String> {
    comp.precedence_order()
        .unwrap()
        .iter()
        .map(|m| m.name().to_string())
        .collect()
}

/////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_diamond() {
    let o = MixinDef::new("O").into_arc();
    let a = MixinDef::new("A").with_base(o.clone()).into_arc();
    let b = MixinDef::new("B").with_base(o.clone()).into_arc();
    let c = MixinDef::new("C").with_base(a.clone()).with_base(b.clone());

    let comp = Composition::new("X").with_mixin(c);

    pretty_assertions::assert_eq!(order(&comp), ["C", "A", "B", "O"]);
}

#[test]
fn test_classic_c3_example() {
    // Hierarchy from the C3 paper
    let o = MixinDef::new("O").into_arc();
    let a = MixinDef::new("A").with_base(o.clone()).into_arc();
    let b = MixinDef::new("B").with_base(o.clone()).into_arc();
    let c = MixinDef::new("C").with_base(o.clone()).into_arc();
    let d = MixinDef::new("D").with_base(o.clone()).into_arc();
    let e = MixinDef::new("E").with_base(o.clone()).into_arc();
    let k1 = MixinDef::new("K1")
        .with_base(a.clone())
        .with_base(b.clone())
        .with_base(c.clone())
        .into_arc();
    let k2 = MixinDef::new("K2")
        .with_base(d.clone())
        .with_base(b.clone())
        .with_base(e.clone())
        .into_arc();
    let k3 = MixinDef::new("K3")
        .with_base(d.clone())
        .with_base(a.clone())
        .into_arc();

    let comp = Composition::new("Z").with_mixins([k1, k2, k3]);

    pretty_assertions::assert_eq!(
        order(&comp),
        ["K1", "K2", "K3", "D", "A", "B", "C", "E", "O"]
    );
}

#[test]
fn test_inconsistent_order() {
    let a = MixinDef::new("A").into_arc();
    let b = MixinDef::new("B").into_arc();
    let ab = MixinDef::new("AB").with_base(a.clone()).with_base(b.clone());
    let ba = MixinDef::new("BA").with_base(b.clone()).with_base(a.clone());

    let err = Composition::new("X")
        .with_mixin(ab)
        .with_mixin(ba)
        .compose(&MapEnv::new())
        .unwrap_err();

    pretty_assertions::assert_eq!(
        err,
        ComposeError::Linearization {
            composition: "X".to_string(),
            message: "no consistent order exists between `A`, `B`".to_string(),
        }
    );
}

#[test]
fn test_base_listed_before_subclass() {
    let a = MixinDef::new("A").into_arc();
    let b = MixinDef::new("B").with_base(a.clone()).into_arc();

    let err = Composition::new("X")
        .with_mixin(a)
        .with_mixin(b)
        .precedence_order()
        .unwrap_err();

    assert!(matches!(err, ComposeError::Linearization { .. }), "{err:?}");
}

#[test]
fn test_conflicting_names() {
    let first = MixinDef::new("Storage").into_arc();
    let second = MixinDef::new("Storage").into_arc();

    let err = Composition::new("X")
        .with_mixin(first)
        .with_mixin(second)
        .precedence_order()
        .unwrap_err();

    pretty_assertions::assert_eq!(
        err,
        ComposeError::ConflictingMixin {
            name: "Storage".to_string()
        }
    );
}

#[test]
fn test_composition_named_after_mixin() {
    let storage = MixinDef::new("Storage").into_arc();
    let media = MixinDef::new("Media").with_base(storage);

    let err = Composition::new("Storage")
        .with_mixin(media)
        .compose(&MapEnv::new())
        .unwrap_err();

    pretty_assertions::assert_eq!(
        err,
        ComposeError::ConflictingMixin {
            name: "Storage".to_string()
        }
    );
}

/////////////////////////////////////////////////////////////////////////////////////////
