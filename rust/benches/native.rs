#![allow(unused)]
use rand::Rng;

pub(crate) fn generate_random_vector(dim: usize) -> Vec<f32> {
    (0..dim).map(|_| rand::thread_rng().gen()).collect()
}

pub(crate) fn add_cpu(a: &[f32], b: &[f32]) -> Option<Vec<f32>> {
    if a.len() != b.len() {
        return None;
    }

    Some(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub(crate) fn fma_cpu(a: &[f32], b: &[f32], c: &[f32]) -> Option<Vec<f32>> {
    if a.len() != b.len() || a.len() != c.len() {
        return None;
    }

    Some(
        a.iter()
            .zip(b)
            .zip(c)
            .map(|((x, y), z)| x.mul_add(*y, *z))
            .collect(),
    )
}

pub(crate) fn sum_cpu(a: &[f32]) -> f32 {
    a.iter().sum()
}

pub(crate) fn dot_cpu(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    Some(a.iter().zip(b).map(|(x, y)| x * y).sum())
}
