//! Bloom pass tests
//!
//! - pass-through behavior of an invalid instance
//! - ping-pong buffer alternation (source ≠ destination, every iteration)
//! - depth-test save/restore around the fullscreen passes
//! - resize keeps the previous buffers on failure

mod common;

use std::sync::Arc;

use prism::gfx::{TextureDesc, TextureFormat, UniformValue};
use prism::renderer::passes::Bloom;
use prism::GraphicsDevice;

use common::{shader_ref, Event, RecordingDevice, RecordingShader};

fn make_hdr_texture(device: &mut RecordingDevice) -> prism::gfx::TextureRef {
    device
        .create_texture_2d(&TextureDesc::new(1280, 720, TextureFormat::Rgb16F))
        .unwrap()
}

fn make_bloom(device: &mut RecordingDevice) -> (Bloom, Arc<RecordingShader>, Arc<RecordingShader>) {
    let extract = RecordingShader::new("bloom_extract");
    let blur = RecordingShader::new("bloom_blur");
    let bloom = Bloom::new(device, shader_ref(&extract), shader_ref(&blur), 640, 360);
    (bloom, extract, blur)
}

#[test]
fn invalid_bloom_returns_input_unchanged() {
    let mut device = RecordingDevice::new();
    let extract = RecordingShader::new_invalid("bloom_extract");
    let blur = RecordingShader::new("bloom_blur");
    let bloom = Bloom::new(&mut device, shader_ref(&extract), shader_ref(&blur), 640, 360);
    assert!(!bloom.is_valid());

    let hdr = make_hdr_texture(&mut device);
    device.clear_events();
    let out = bloom.process(&mut device, &hdr);

    assert!(Arc::ptr_eq(&out, &hdr), "invalid bloom must pass the input through");
    assert!(
        !device.events().iter().any(|e| matches!(e, Event::DrawFullscreenQuad)),
        "invalid bloom must not draw"
    );
}

#[test]
fn extract_uniforms_carry_threshold_and_knee() {
    let mut device = RecordingDevice::new();
    let (mut bloom, extract, _) = make_bloom(&mut device);
    bloom.set_threshold(1.5);
    bloom.set_knee(0.5);

    let hdr = make_hdr_texture(&mut device);
    bloom.process(&mut device, &hdr);

    assert_eq!(extract.uniform("u_Threshold"), Some(UniformValue::Float(1.5)));
    assert_eq!(extract.uniform("u_Knee"), Some(UniformValue::Float(0.5)));
    assert_eq!(extract.uniform("u_HDRBuffer"), Some(UniformValue::Int(0)));
}

#[test]
fn ping_pong_never_reads_and_writes_the_same_buffer() {
    let mut device = RecordingDevice::new();
    let (mut bloom, _, _) = make_bloom(&mut device);
    bloom.set_blur_passes(5);

    let hdr = make_hdr_texture(&mut device);
    device.clear_events();
    bloom.process(&mut device, &hdr);

    // Bind order: extract fb, then per iteration horizontal fb + vertical fb
    let binds: Vec<u64> = device
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::BindFramebuffer(id) => Some(*id),
            _ => None,
        })
        .collect();

    assert_eq!(binds.len(), 1 + 2 * 5, "extract + two binds per blur iteration");

    let blur_binds = &binds[1..];
    for pair in blur_binds.chunks(2) {
        assert_ne!(pair[0], pair[1], "horizontal and vertical passes must use different buffers");
    }
    // Exactly the two blur framebuffers participate
    let mut unique = blur_binds.to_vec();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 2, "blur must ping-pong between exactly two buffers");
}

#[test]
fn blur_transfers_the_result_out_of_the_extract_buffer() {
    let mut device = RecordingDevice::new();
    let (mut bloom, _, _) = make_bloom(&mut device);

    let hdr = make_hdr_texture(&mut device);

    bloom.set_blur_passes(0);
    let unblurred = bloom.process(&mut device, &hdr);
    bloom.set_blur_passes(1);
    let blurred = bloom.process(&mut device, &hdr);

    assert!(!Arc::ptr_eq(&unblurred, &hdr));
    assert!(!Arc::ptr_eq(&blurred, &hdr));
    assert!(
        !Arc::ptr_eq(&unblurred, &blurred),
        "a blur iteration must hand ownership of the result to a blur buffer"
    );
}

#[test]
fn depth_test_state_is_restored() {
    let mut device = RecordingDevice::new();
    let (mut bloom, _, _) = make_bloom(&mut device);
    let hdr = make_hdr_texture(&mut device);

    device.enable_depth_test();
    bloom.process(&mut device, &hdr);
    assert!(device.depth_test_enabled(), "depth test must be restored when it was on");

    device.disable_depth_test();
    bloom.process(&mut device, &hdr);
    assert!(!device.depth_test_enabled(), "depth test must stay off when it was off");

    let _ = bloom;
}

#[test]
fn zero_blur_passes_returns_the_extract_buffer() {
    let mut device = RecordingDevice::new();
    let (mut bloom, _, _) = make_bloom(&mut device);
    bloom.set_blur_passes(0);

    let hdr = make_hdr_texture(&mut device);
    device.clear_events();
    let out = bloom.process(&mut device, &hdr);

    assert!(!Arc::ptr_eq(&out, &hdr));
    let quads = device
        .events()
        .iter()
        .filter(|e| matches!(e, Event::DrawFullscreenQuad))
        .count();
    assert_eq!(quads, 1, "only the extract pass should draw");
}

#[test]
fn failed_resize_keeps_previous_buffers() {
    let mut device = RecordingDevice::new();
    let (mut bloom, _, _) = make_bloom(&mut device);
    assert_eq!(bloom.dimensions(), Some((640, 360)));

    device.fail_framebuffers = true;
    assert!(!bloom.resize(&mut device, 960, 540));
    device.fail_framebuffers = false;

    assert!(bloom.is_valid());
    assert_eq!(bloom.dimensions(), Some((640, 360)), "old buffers must survive a failed resize");

    assert!(bloom.resize(&mut device, 960, 540));
    assert_eq!(bloom.dimensions(), Some((960, 540)));
}
