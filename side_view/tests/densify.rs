use side_view::{densify, STRUCTURE_OFFSET};

fn is_monotonic(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[0] <= w[1])
}

#[test]
fn no_structures_returns_input() {
    let cs = vec![0.0, 2.5, 7.0];
    let vs = vec![1.0, -1.0, 3.0];
    let (c, v) = densify(&cs, &vs, &[]).unwrap();
    assert_eq!(c, cs);
    assert_eq!(v, vs);
}

#[test]
fn empty_everything_returns_empty() {
    let (c, v) = densify(&[], &[], &[]).unwrap();
    assert!(c.is_empty());
    assert!(v.is_empty());
}

#[test]
fn adds_two_points_per_structure() {
    let cs = vec![0.0, 10.0, 20.0, 30.0, 40.0];
    let vs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let structures = vec![-1.0, 5.0, 10.0, 10.0, 25.0, 45.0];
    let (c, v) = densify(&cs, &vs, &structures).unwrap();
    assert_eq!(c.len(), cs.len() + 2 * structures.len());
    assert_eq!(v.len(), c.len());
    assert!(is_monotonic(&c));
}

#[test]
fn synthetic_values_come_from_samples() {
    let cs = vec![0.0, 3.0, 7.5, 12.0];
    let vs = vec![4.0, 3.5, 2.25, 1.0];
    let (c, v) = densify(&cs, &vs, &[1.0, 7.5, 11.9995, 20.0]).unwrap();
    assert!(is_monotonic(&c));
    for value in v {
        assert!(vs.contains(&value));
    }
}

#[test]
fn input_points_keep_their_order() {
    let cs = vec![0.0, 1.0, 2.0, 3.0];
    let vs = vec![10.0, 11.0, 12.0, 13.0];
    let (c, v) = densify(&cs, &vs, &[0.5, 2.5]).unwrap();
    let mut it = c.iter().zip(&v);
    for (&sc, &sv) in cs.iter().zip(&vs) {
        assert!(it.any(|(&oc, &ov)| oc == sc && ov == sv));
    }
}

#[test]
fn structure_on_sample() {
    let (c, v) = densify(&[0.0, 10.0, 20.0], &[5.0, 6.0, 7.0], &[10.0]).unwrap();
    assert_eq!(c.len(), 5);
    assert!(is_monotonic(&c));
    assert_eq!(c[..2], [0.0, 10.0]);
    // before point is pulled up to the sample that coincides with the structure
    assert_eq!(c[2], 10.0);
    assert!((c[3] - (10.0 + STRUCTURE_OFFSET)).abs() < 1e-12);
    assert_eq!(c[4], 20.0);
    assert_eq!(v, vec![5.0, 6.0, 6.0, 7.0, 7.0]);
}

#[test]
fn structure_between_samples() {
    let (c, v) = densify(&[0.0, 10.0], &[5.0, 6.0], &[4.0]).unwrap();
    assert_eq!(v, vec![5.0, 5.0, 6.0, 6.0]);
    assert!((c[1] - (4.0 - STRUCTURE_OFFSET)).abs() < 1e-12);
    assert!((c[2] - (4.0 + STRUCTURE_OFFSET)).abs() < 1e-12);
}

#[test]
fn structure_before_first_sample() {
    let (c, v) = densify(&[5.0, 10.0], &[1.0, 2.0], &[0.0]).unwrap();
    assert_eq!(c.len(), 4);
    assert_eq!(c[0], 0.0);
    assert!((c[1] - 0.001).abs() < 1e-12);
    assert_eq!(c[2..], [5.0, 10.0]);
    assert_eq!(v, vec![1.0, 1.0, 1.0, 2.0]);
}

#[test]
fn structure_after_last_sample() {
    let (c, v) = densify(&[0.0, 10.0], &[1.0, 2.0], &[12.0]).unwrap();
    assert_eq!(c[..2], [0.0, 10.0]);
    assert!((c[2] - 11.999).abs() < 1e-9);
    assert!((c[3] - 12.001).abs() < 1e-9);
    assert_eq!(v, vec![1.0, 2.0, 2.0, 2.0]);
}

#[test]
fn after_point_stays_before_next_structure() {
    let second = 10.0004;
    let (c, v) = densify(&[0.0, 20.0], &[1.0, 2.0], &[10.0, second]).unwrap();
    assert_eq!(c.len(), 6);
    assert!(is_monotonic(&c));
    assert!(c[2] <= second - 0.5 * STRUCTURE_OFFSET);
    assert!(c[3] >= c[2]);
    assert_eq!(v, vec![1.0, 1.0, 2.0, 1.0, 2.0, 2.0]);
}

#[test]
fn coinciding_structures_stay_monotonic() {
    let (c, _) = densify(&[0.0, 5.0, 10.0], &[0.0, 1.0, 2.0], &[5.0, 5.0, 5.0]).unwrap();
    assert_eq!(c.len(), 9);
    assert!(is_monotonic(&c));
}

#[test]
fn structures_without_samples_have_nan_values() {
    let (c, v) = densify(&[], &[], &[1.0, 2.0]).unwrap();
    assert_eq!(c.len(), 4);
    assert!(is_monotonic(&c));
    assert!(v.iter().all(|x| x.is_nan()));
}

#[test]
fn inputs_are_not_modified() {
    let cs = vec![0.0, 10.0];
    let vs = vec![1.0, 2.0];
    let structures = vec![5.0];
    let _ = densify(&cs, &vs, &structures).unwrap();
    assert_eq!(cs, vec![0.0, 10.0]);
    assert_eq!(vs, vec![1.0, 2.0]);
    assert_eq!(structures, vec![5.0]);
}
