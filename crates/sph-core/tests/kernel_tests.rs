use std::f32::consts::PI;
use sph_core::kernel::{normalization, SmoothingKernel};

#[test]
fn test_normalization_formula() {
    let h = 2.0_f32;
    let n = 3_u32;
    let expected = (9.0 + 9.0 + 2.0) / (2.0 * PI * h.powi(5));
    let result = normalization(h, n);
    assert!(
        (result - expected).abs() < expected * 1e-6,
        "normalization({h}, {n}) = {result}, expected {expected}"
    );
}

#[test]
fn test_kernel_zero_distance() {
    let kernel = SmoothingKernel::new(1.0, 2);
    let result = kernel.value(0.0);
    // At r=0 the (h - r)^2 term equals 1
    let expected = 12.0 / (2.0 * PI);
    assert!(
        (result - expected).abs() < expected * 1e-6,
        "kernel(0) = {result}, expected {expected}"
    );
    assert!(result.is_finite() && result > 0.0);
}

#[test]
fn test_kernel_at_boundary() {
    for exponent in 1..=6 {
        let kernel = SmoothingKernel::new(0.7, exponent);
        assert_eq!(kernel.value(0.7), 0.0, "kernel(h) should be 0 for n={exponent}");
    }
}

#[test]
fn test_kernel_beyond_boundary_clamped() {
    let kernel = SmoothingKernel::new(1.0, 2);
    assert_eq!(kernel.value(1.5), 0.0);
    assert_eq!(kernel.value(100.0), 0.0);
}

#[test]
fn test_kernel_monotonic_non_increasing() {
    for &(h, n) in &[(0.5_f32, 1_u32), (1.0, 2), (3.0, 4), (10.0, 3)] {
        let kernel = SmoothingKernel::new(h, n);
        let peak = kernel.value(0.0);
        let mut prev = peak;
        for step in 1..=200 {
            let r = h * step as f32 / 200.0;
            let w = kernel.value(r);
            assert!(w <= prev, "not monotonic at r={r} (h={h}, n={n}): {w} > {prev}");
            assert!(w <= peak);
            prev = w;
        }
    }
}

#[test]
fn test_kernel_midpoint() {
    let kernel = SmoothingKernel::new(1.0, 2);
    let mid = kernel.value(0.5);
    let expected = kernel.value(0.0) * 0.25;
    assert!((mid - expected).abs() < 1e-6, "kernel(h/2) = {mid}, expected {expected}");
}

#[test]
fn test_gradient_magnitude_zero_distance_finite() {
    let kernel = SmoothingKernel::new(1.0, 2);
    let g = kernel.gradient_magnitude(0.0);
    // n * c * h^(n-1)
    let expected = 2.0 * kernel.normalization();
    assert!(g.is_finite());
    assert!((g - expected).abs() < expected * 1e-6, "gradient(0) = {g}, expected {expected}");
}

#[test]
fn test_gradient_magnitude_at_boundary() {
    let kernel = SmoothingKernel::new(1.0, 3);
    assert_eq!(kernel.gradient_magnitude(1.0), 0.0);
    assert_eq!(kernel.gradient_magnitude(2.0), 0.0);
}

#[test]
fn test_gradient_magnitude_linear_kernel_constant() {
    // n = 1: slope is the same everywhere inside the support
    let kernel = SmoothingKernel::new(2.0, 1);
    let a = kernel.gradient_magnitude(0.0);
    let b = kernel.gradient_magnitude(1.3);
    assert!((a - b).abs() < 1e-6);
    assert!((a - kernel.normalization()).abs() < 1e-6);
}
