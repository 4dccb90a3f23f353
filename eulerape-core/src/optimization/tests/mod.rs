use crate::{
    area_spec::RequiredAreaSpec,
    diagram::EllipseDiagram,
    ellipse::Ellipse,
};

mod decay;
mod retry;
mod scenarios;

/// Venn-3 spec with equal sets and pairwise overlaps.
pub fn symmetric_spec() -> RequiredAreaSpec {
    RequiredAreaSpec::new(
        &[ 'a', 'b', 'c' ],
        [ ("a", 100.), ("b", 100.), ("c", 100.), ("ab", 20.), ("ac", 20.), ("bc", 20.), ("abc", 5.) ],
    ).unwrap()
}

pub fn circles(params: &[ (char, f64, f64, f64) ]) -> EllipseDiagram {
    EllipseDiagram::new(
        params.iter().map(|(label, x, y, r)| Ellipse::circle(*label, *x, *y, *r).unwrap()).collect()
    ).unwrap()
}

pub fn assert_non_increasing(history: &[f64]) {
    for (prev, next) in history.iter().zip(history.iter().skip(1)) {
        assert!(next <= prev, "fitness increased: {} → {}", prev, next);
    }
}
