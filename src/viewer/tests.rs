use super::*;
use crate::geometry::{AspectPreset, CropEditor, CropHandle, NormPoint};
use crate::state::InMemorySessionRepository;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// A 200x100 image in a roomy viewport is shown at 1:1. The host reports the
// image and stage at (100, 100) on screen.
const IMAGE_RECT: ScreenRect = ScreenRect {
    left: 100.0,
    top: 100.0,
    width: 200.0,
    height: 100.0,
};

fn session() -> ViewerSession {
    let mut session = ViewerSession::default();
    session.set_viewport(Size::new(1000.0, 1000.0));
    session.load_image("a.png", Size::new(200.0, 100.0));
    session
}

fn ctx(session: &ViewerSession) -> PointerContext {
    session.pointer_context(IMAGE_RECT, Size::new(200.0, 100.0), IMAGE_RECT)
}

fn click(session: &mut ViewerSession, x: f64, y: f64) -> bool {
    let ctx = ctx(session);
    session.pointer_down(ScreenPoint::new(x, y), &ctx)
}

/// Two segments of 20 and 40 image pixels.
fn place_two_segments(session: &mut ViewerSession) {
    session.set_measuring(true);
    assert!(click(session, 100.0, 100.0));
    assert!(click(session, 120.0, 100.0));
    assert!(click(session, 100.0, 150.0));
    assert!(click(session, 140.0, 150.0));
}

#[test]
fn test_load_image_sets_stage_and_calibration() {
    let session = session();
    let stage = session.stage_box();
    assert_eq!(stage.stage_size(), Size::new(200.0, 100.0));
    assert_eq!(session.calibration().width_text(), "200");
    assert_eq!(session.calibration().height_text(), "100");
    assert_eq!(session.aspect_text(), "2.00:1");
}

#[test]
fn test_relative_labels_end_to_end() {
    let mut session = session();
    place_two_segments(&mut session);

    let segments = session.segments();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].label, "X");
    assert_eq!(segments[1].label, "2x");
    assert!(approx_eq(segments[0].length, 0.1));
    assert_eq!(segments[1].index, 2);
}

#[test]
fn test_absolute_labels_follow_calibration() {
    let mut session = session();
    place_two_segments(&mut session);
    session.set_mode(MeasurementMode::Absolute);

    session.set_calibration_width("100");
    assert_eq!(session.calibration().height_text(), "50.00");

    let labels: Vec<String> = session.segments().into_iter().map(|s| s.label).collect();
    assert_eq!(labels, vec!["10", "20"]);
}

#[test]
fn test_lengths_survive_quarter_turn() {
    let mut session = session();
    place_two_segments(&mut session);
    let before: Vec<f64> = session.segments().iter().map(|s| s.length).collect();

    session.set_rotation(90);
    let after: Vec<f64> = session.segments().iter().map(|s| s.length).collect();
    for (a, b) in before.iter().zip(&after) {
        assert!(approx_eq(*a, *b));
    }
    assert_eq!(session.stage_box().stage_size(), Size::new(100.0, 200.0));
}

#[test]
fn test_click_outside_image_or_crop_is_ignored() {
    let mut session = session();
    session.set_measuring(true);
    assert!(!click(&mut session, 50.0, 50.0));

    session.set_crop(Some(CropRect::new(0.5, 0.0, 0.5, 1.0)));
    assert!(!click(&mut session, 150.0, 150.0));
    assert!(click(&mut session, 250.0, 150.0));
    assert_eq!(session.measurements().points(), &[NormPoint::new(0.75, 0.5)]);
}

#[test]
fn test_undo_and_reset() {
    let mut session = session();
    place_two_segments(&mut session);

    session.undo_point();
    assert_eq!(session.measurements().len(), 3);
    assert_eq!(session.segments().len(), 1);
    assert_eq!(session.measure_state(), MeasureState::PlacingPoints);

    session.reset_points();
    assert!(session.measurements().is_empty());
    assert_eq!(session.measure_state(), MeasureState::Idle);
}

#[test]
fn test_measuring_off_keeps_points() {
    let mut session = session();
    place_two_segments(&mut session);
    session.set_measuring(false);
    assert_eq!(session.measurements().len(), 4);
}

#[test]
fn test_image_change_clears_points() {
    let mut session = session();
    place_two_segments(&mut session);

    session.load_image("a.png", Size::new(200.0, 100.0));
    assert_eq!(session.measurements().len(), 4);

    session.load_image("b.png", Size::new(300.0, 300.0));
    assert!(session.measurements().is_empty());
    assert_eq!(session.calibration().width_text(), "300");
}

#[test]
fn test_image_change_keeps_points_when_configured() {
    let mut config = ViewerConfig::default();
    config.measurement.clear_on_image_change = false;
    let mut session = ViewerSession::new(config);
    session.set_viewport(Size::new(1000.0, 1000.0));
    session.load_image("a.png", Size::new(200.0, 100.0));
    place_two_segments(&mut session);

    session.load_image("b.png", Size::new(300.0, 300.0));
    assert_eq!(session.measurements().len(), 4);
}

#[test]
fn test_point_drag_is_clamped() {
    let mut session = session();
    session.set_measuring(true);
    assert!(click(&mut session, 120.0, 100.0));
    assert!(session.begin_point_drag(0));

    let ctx = ctx(&session);
    assert!(session.pointer_move(ScreenPoint::new(90.0, 150.0), &ctx));
    assert_eq!(session.measurements().points(), &[NormPoint::new(0.0, 0.5)]);

    session.pointer_up();
    assert!(session.measurements().dragging().is_none());
    assert!(!session.pointer_move(ScreenPoint::new(150.0, 150.0), &ctx));
}

#[test]
fn test_pan_drag_moves_offset() {
    let mut session = session();
    let ctx = ctx(&session);

    session.pointer_down(ScreenPoint::new(10.0, 10.0), &ctx);
    assert!(session.is_panning());
    assert!(session.pointer_move(ScreenPoint::new(15.0, 7.0), &ctx));
    let transform = session.transform();
    assert_eq!((transform.offset_x, transform.offset_y), (5.0, -3.0));

    session.pointer_leave();
    assert!(!session.is_panning());
    assert!(!session.pointer_move(ScreenPoint::new(50.0, 50.0), &ctx));
}

#[test]
fn test_measuring_does_not_pan() {
    let mut session = session();
    session.set_measuring(true);
    click(&mut session, 150.0, 150.0);
    assert!(!session.is_panning());
}

#[test]
fn test_zoom_is_clamped_and_resettable() {
    let mut session = session();
    for _ in 0..100 {
        session.wheel(-1.0);
    }
    assert_eq!(session.transform().zoom, 8.0);

    for _ in 0..100 {
        session.zoom_out();
    }
    assert_eq!(session.transform().zoom, 0.2);

    session.zoom_in();
    assert_eq!(session.transform().zoom, 0.4);

    session.wheel(0.0);
    assert_eq!(session.transform().zoom, 0.4);

    session.reset_view();
    assert_eq!(session.transform(), ViewTransform::identity());
}

#[test]
fn test_snapshot_round_trip_through_repository() {
    let mut repo = InMemorySessionRepository::new();
    let mut session = session();
    place_two_segments(&mut session);
    session.set_rotation(270);
    session.set_crop(Some(CropRect::new(0.1, 0.1, 0.5, 0.5)));
    session.set_mode(MeasurementMode::Absolute);
    session.zoom_in();
    session.save_to(&mut repo).unwrap();

    let mut restored = ViewerSession::default();
    restored.set_viewport(Size::new(1000.0, 1000.0));
    restored.load_image("a.png", Size::new(200.0, 100.0));
    assert!(restored.restore_from(&repo).unwrap());

    assert_eq!(restored.snapshot(), session.snapshot());
    assert_eq!(restored.rotation().degrees(), 270);
    assert_eq!(restored.mode(), MeasurementMode::Absolute);
    assert_eq!(restored.segments().len(), 2);
}

#[test]
fn test_restore_from_unknown_image() {
    let repo = InMemorySessionRepository::new();
    let mut session = session();
    assert!(!session.restore_from(&repo).unwrap());

    let mut empty = ViewerSession::default();
    assert!(matches!(empty.restore_from(&repo), Err(SessionError::NoImage)));
    assert!(matches!(
        empty.save_to(&mut InMemorySessionRepository::new()),
        Err(SessionError::NoImage)
    ));
}

#[test]
fn test_side_distance_only_in_absolute_mode() {
    let mut session = session();
    session.set_show_side_distance(true);
    let pointer = ScreenPoint::new(150.0, 125.0);
    assert!(session.side_distance_at(pointer, &ctx(&session)).is_none());

    session.set_mode(MeasurementMode::Absolute);
    let guide = session.side_distance_at(pointer, &ctx(&session)).unwrap();
    assert!(approx_eq(guide.horizontal, 50.0));
    assert!(approx_eq(guide.vertical, 25.0));
    assert_eq!(guide.horizontal_label, "50");
    assert_eq!(guide.vertical_label, "25");

    session.set_show_side_distance(false);
    assert!(session.side_distance_at(pointer, &ctx(&session)).is_none());
}

#[test]
fn test_side_distance_hidden_outside_crop() {
    let mut session = session();
    session.set_show_side_distance(true);
    session.set_mode(MeasurementMode::Absolute);
    session.set_crop(Some(CropRect::new(0.5, 0.0, 0.5, 1.0)));
    let ctx = ctx(&session);

    assert!(session.side_distance_at(ScreenPoint::new(150.0, 150.0), &ctx).is_none());
    let guide = session.side_distance_at(ScreenPoint::new(250.0, 150.0), &ctx).unwrap();
    assert!(approx_eq(guide.cursor.nx, 0.5));
    assert!(approx_eq(guide.cursor.ny, 0.5));
    // The crop is 100x100 px and the calibration follows it.
    assert!(approx_eq(guide.horizontal, 50.0));
}

#[test]
fn test_loupe_needs_hover_and_toggle() {
    let mut session = session();
    let ctx = ctx(&session);
    session.pointer_move(ScreenPoint::new(150.0, 125.0), &ctx);
    assert!(session.loupe_layout().is_none());

    session.set_loupe_enabled(true);
    assert!(session.loupe_layout().is_none());

    session.set_hovering(true);
    let layout = session.loupe_layout().unwrap();
    assert_eq!(layout.origin, ScreenPoint::new(30.0, 5.0));
    assert_eq!(layout.stage, Size::new(200.0, 100.0));

    session.pointer_leave();
    assert!(session.loupe_layout().is_none());
}

#[test]
fn test_grid_lines_follow_crop() {
    let mut session = session();
    assert_eq!(session.grid_lines(), (Vec::new(), Vec::new()));

    session.grid_mut().visible = true;
    session.set_crop(Some(CropRect::new(0.5, 0.0, 0.5, 1.0)));
    let (vertical, horizontal) = session.grid_lines();
    assert_eq!(vertical, vec![0.75]);
    assert_eq!(horizontal, vec![0.5]);
}

#[test]
fn test_crop_resets_calibration_to_cropped_canvas() {
    let mut session = session();
    session.set_mode(MeasurementMode::Absolute);
    session.set_crop(Some(CropRect::new(0.0, 0.0, 0.5, 1.0)));
    assert_eq!(session.effective_natural(), Size::new(100.0, 100.0));
    assert_eq!(session.calibration().width_text(), "100");
    assert_eq!(session.calibration().height_text(), "100");

    // A 99 px segment on the 100 px wide crop.
    session.set_measuring(true);
    assert!(click(&mut session, 100.0, 150.0));
    assert!(click(&mut session, 199.0, 150.0));
    assert_eq!(session.segments()[0].label, "99");

    session.set_crop(None);
    assert_eq!(session.calibration().width_text(), "200");
}

#[test]
fn test_reloading_same_image_keeps_typed_calibration() {
    let mut session = session();
    session.set_calibration_width("30");
    session.load_image("a.png", Size::new(200.0, 100.0));
    assert_eq!(session.calibration().width_text(), "30");
    assert_eq!(session.calibration().height_text(), "15.00");

    // Same key with a new size is a canvas change.
    session.load_image("a.png", Size::new(400.0, 100.0));
    assert_eq!(session.calibration().width_text(), "400");
}

#[test]
fn test_rotation_resets_calibration_only_when_canvas_changes() {
    let mut session = session();
    session.set_calibration_width("30");

    session.set_rotation(90);
    assert_eq!(session.calibration().width_text(), "30");

    session.set_rotation(45);
    assert_eq!(session.calibration().width_text(), "212");
    assert_eq!(session.calibration().height_text(), "212");
}

#[test]
fn test_calibration_reset_waits_while_editing() {
    let mut session = session();
    session.begin_calibration_edit(CalibrationField::Width);
    session.set_crop(Some(CropRect::new(0.0, 0.0, 0.5, 1.0)));
    assert_eq!(session.calibration().width_text(), "200");

    session.end_calibration_edit(CalibrationField::Width);
    session.set_rotation(0);
    assert_eq!(session.calibration().width_text(), "100");
}

#[test]
fn test_restore_keeps_stored_calibration() {
    let mut session = session();
    session.set_crop(Some(CropRect::new(0.0, 0.0, 0.5, 1.0)));
    session.set_calibration_width("42");
    let snapshot = session.snapshot();

    let mut restored = ViewerSession::default();
    restored.set_viewport(Size::new(1000.0, 1000.0));
    restored.load_image("a.png", Size::new(200.0, 100.0));
    restored.restore(&snapshot);
    assert_eq!(restored.calibration().width_text(), "42");
    restored.set_rotation(0);
    assert_eq!(restored.calibration().width_text(), "42");
}

#[test]
fn test_diagonal_crop_clips_by_stage_crop() {
    let mut session = ViewerSession::default();
    session.set_viewport(Size::new(1000.0, 1000.0));
    session.load_image("square.png", Size::new(100.0, 100.0));
    session.set_rotation(45);
    session.set_crop(Some(CropRect::new(0.4, 0.4, 0.2, 0.2)));

    // The rotated element's bounding box equals the stage, centred at (200, 200).
    let stage = session.stage_box();
    let rect = ScreenRect::new(
        200.0 - stage.stage_w / 2.0,
        200.0 - stage.stage_h / 2.0,
        stage.stage_w,
        stage.stage_h,
    );
    let ctx = session.pointer_context(rect, Size::new(100.0, 100.0), rect);

    // The stage crop maps to a diamond whose bounding box is twice as wide.
    let image_box = session.crop_image().unwrap();
    assert!((image_box.x - 0.3).abs() < 1e-6);
    assert!((image_box.w - 0.4).abs() < 1e-6);

    session.set_measuring(true);
    let inside = ScreenPoint::new(186.0, 186.0);
    assert!(session.pointer_down(inside, &ctx));
    let placed = session.measurements().points()[0];
    assert!((placed.nx - 0.302).abs() < 1e-3);
    assert!((placed.ny - 0.5).abs() < 1e-6);

    // Just outside the stage crop: its image point lies in the box but is rejected.
    let outside = ScreenPoint::new(185.0, 187.0);
    let uncropped = PointerContext {
        crop: None,
        crop_image: None,
        ..ctx
    };
    let image_point = map_pointer(outside, &uncropped).unwrap();
    assert!(image_box.contains(image_point.nx, image_point.ny));
    assert!(!session.pointer_down(outside, &ctx));
    assert_eq!(session.measurements().len(), 1);
}

#[test]
fn test_rotate_right_carries_crop() {
    let mut session = session();
    session.set_crop(Some(CropRect::new(0.0, 0.0, 0.5, 1.0)));
    session.rotate_right();

    assert_eq!(session.rotation().degrees(), 90);
    let crop = session.crop().unwrap();
    assert!(approx_eq(crop.x, 0.0));
    assert!(approx_eq(crop.y, 0.0));
    assert!(approx_eq(crop.w, 1.0));
    assert!(approx_eq(crop.h, 0.5));
    // Same image region, so the canvas is unchanged.
    assert_eq!(session.effective_natural(), Size::new(100.0, 100.0));

    for _ in 0..3 {
        session.rotate_right();
    }
    let crop = session.crop().unwrap();
    assert!(approx_eq(crop.w, 0.5));
    assert!(approx_eq(crop.h, 1.0));
    assert_eq!(session.rotation(), Rotation::ZERO);
}

#[test]
fn test_rotate_right_in_crop_mode_keeps_crop() {
    let mut session = session();
    let crop = CropRect::new(0.0, 0.0, 0.5, 1.0);
    session.set_crop(Some(crop));
    session.enter_crop_mode();
    session.rotate_right();
    assert_eq!(session.crop(), Some(crop));
}

#[test]
fn test_crop_tool_edit_and_apply() {
    let mut session = session();
    session.enter_crop_mode();
    assert!(session.is_cropping());
    assert_eq!(session.crop_editor().unwrap().draft(), CropEditor::DEFAULT_DRAFT);

    // The crop stage is the whole 200x100 image at (100, 100).
    session.crop_pointer_down(CropHandle::SouthEast, ScreenPoint::new(280.0, 190.0), &IMAGE_RECT);
    assert!(session.crop_pointer_move(ScreenPoint::new(200.0, 160.0), &IMAGE_RECT));
    session.crop_pointer_up();
    assert!(!session.crop_pointer_move(ScreenPoint::new(120.0, 120.0), &IMAGE_RECT));

    assert!(session.apply_crop());
    assert!(!session.is_cropping());
    let crop = session.crop().unwrap();
    assert!(approx_eq(crop.w, 0.4));
    assert!(approx_eq(crop.h, 0.5));
    assert_eq!(session.effective_natural(), Size::new(80.0, 50.0));
    assert_eq!(session.calibration().width_text(), "80");
}

#[test]
fn test_crop_aspect_preset_and_cancel() {
    let mut session = session();
    session.enter_crop_mode();
    session.set_crop_aspect(AspectPreset::Square);
    let draft = session.crop_editor().unwrap().draft();
    // Square on screen: 200 px stage width, 100 px height.
    assert!(approx_eq(draft.w * 200.0, draft.h * 100.0));

    session.cancel_crop_mode();
    assert!(session.crop().is_none());
    assert!(!session.is_cropping());
}

#[test]
fn test_restore_crop_removes_crop() {
    let mut session = session();
    session.set_crop(Some(CropRect::new(0.0, 0.0, 0.5, 1.0)));
    session.enter_crop_mode();
    session.restore_crop();
    assert!(session.crop().is_none());
    assert!(!session.is_cropping());
    assert_eq!(session.calibration().width_text(), "200");
}

#[test]
fn test_image_change_closes_crop_tool() {
    let mut session = session();
    session.enter_crop_mode();
    session.load_image("a.png", Size::new(200.0, 100.0));
    assert!(session.is_cropping());
    session.load_image("b.png", Size::new(200.0, 100.0));
    assert!(!session.is_cropping());
}

#[test]
fn test_signed_rotation_input() {
    let mut session = session();
    session.set_rotation_signed(-90.0);
    assert_eq!(session.rotation().degrees(), 270);
    assert_eq!(session.rotation().signed_degrees(), -90);
    session.set_rotation_signed(f64::INFINITY);
    assert_eq!(session.rotation(), Rotation::ZERO);
}
