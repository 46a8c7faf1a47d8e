use super::*;

#[test]
fn blur_sigma_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = gaussian_blur_rgba8(&src, 1, 2, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 255u8];
    let src = px.repeat((w * h) as usize);
    let out = gaussian_blur_rgba8(&src, w, h, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((3 * w + 3) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = gaussian_blur_rgba8(&src, w, h, 0.5).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 8);
}

#[test]
fn blur_rejects_mismatched_buffer_and_bad_sigma() {
    assert!(gaussian_blur_rgba8(&[0u8; 3], 1, 1, 1.0).is_err());
    assert!(gaussian_blur_rgba8(&[0u8; 4], 1, 1, f32::NAN).is_err());
}

#[test]
fn kernel_radius_tracks_three_sigma() {
    assert_eq!(kernel_radius(0.5), 2);
    assert_eq!(kernel_radius(2.0), 6);
    assert_eq!(kernel_radius(0.01), 1);
}
