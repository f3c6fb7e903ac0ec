//! Viewer session: the transient state of one open reference viewer.
//!
//! The host forwards resize, pointer and button events here and asks for
//! derived values (stage box, labelled segments, loupe layout, ...) when it
//! redraws. Nothing is cached; every derived value is recomputed from the
//! current inputs.

use crate::config::ViewerConfig;
use crate::error::SessionError;
use crate::geometry::{
    AspectPreset, CropEditor, CropHandle, CropRect, NormRect, PointerContext, Rotation,
    ScreenPoint, ScreenRect, Size, StageBox, aspect_text, compute_stage_box, effective_aspect,
    effective_natural, fit_stage_box, loupe_sample_position, map_pointer, map_pointer_unbounded,
    remap_crop_for_rotation, stage_crop_to_image, stage_normalized,
};
use crate::measure::{
    Calibration, CalibrationField, LabelContext, MeasureSession, MeasureState, MeasurementMode,
    Segment, SideDistance, measure_segments, side_distance,
};
use crate::overlay::{GridSettings, LoupeLayout, loupe_layout};
use crate::state::{SNAPSHOT_VERSION, SessionRepository, ViewerSnapshot};
use crate::widget_state::{LoupeState, PanState};
use crate::zoom_math::ViewTransform;

#[cfg(test)]
mod tests;

/// State of one open viewer.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    config: ViewerConfig,
    /// Identifies the displayed image; used for the image-change policy and as
    /// the repository key
    image_key: Option<String>,
    natural: Size,
    viewport: Size,
    rotation: Rotation,
    /// Clamped crop in stage coordinates
    crop: Option<CropRect>,
    /// Open crop tool
    crop_editor: Option<CropEditor>,
    transform: ViewTransform,
    pan: PanState,
    measuring: bool,
    mode: MeasurementMode,
    measurements: MeasureSession,
    calibration: Calibration,
    /// Canvas size the calibration fields were last reset to
    synced_canvas: Option<Size>,
    show_side_distance: bool,
    grid: GridSettings,
    loupe: LoupeState,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl ViewerSession {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            mode: config.measurement.default_mode,
            grid: config.grid.to_settings(),
            config,
            image_key: None,
            natural: Size::ZERO,
            viewport: Size::ZERO,
            rotation: Rotation::ZERO,
            crop: None,
            crop_editor: None,
            transform: ViewTransform::identity(),
            pan: PanState::new(),
            measuring: false,
            measurements: MeasureSession::new(),
            calibration: Calibration::new(),
            synced_canvas: None,
            show_side_distance: false,
            loupe: LoupeState::default(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    // ========================================================================
    // Image, viewport, rotation and crop
    // ========================================================================

    /// Show an image identified by `key` with the given natural size.
    ///
    /// A different key clears the measurement points when
    /// `measurement.clear_on_image_change` is set, and closes the crop tool.
    /// The calibration fields are reset when the image or its canvas size
    /// changed, unless one of them is being edited.
    pub fn load_image(&mut self, key: impl Into<String>, natural: Size) {
        let key = key.into();
        let changed = self.image_key.as_deref() != Some(key.as_str());
        if changed && self.config.measurement.clear_on_image_change && !self.measurements.is_empty()
        {
            log::debug!(
                "Image changed to {}, clearing {} measurement points",
                key,
                self.measurements.len()
            );
            self.measurements.reset();
        }
        if changed {
            self.crop_editor = None;
        }

        self.image_key = Some(key);
        self.natural = natural;
        self.loupe.image_ready = natural.is_positive();
        if !self.loupe.image_ready {
            log::warn!("Image has degenerate natural size {}x{}", natural.w, natural.h);
        }
        self.sync_calibration(changed);
    }

    /// Reset the calibration fields to the canvas size when it changed since
    /// the last reset, or unconditionally with `force`.
    fn sync_calibration(&mut self, force: bool) {
        let effective = self.effective_natural();
        if !force && self.synced_canvas == Some(effective) {
            return;
        }
        if self.calibration.reset_to_canvas(effective) {
            log::debug!("Calibration reset to canvas {}x{}", effective.w, effective.h);
            self.synced_canvas = Some(effective);
        }
    }

    pub fn image_key(&self) -> Option<&str> {
        self.image_key.as_deref()
    }

    pub fn natural(&self) -> Size {
        self.natural
    }

    /// Space available to the stage, from the host's resize observer.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_rotation(&mut self, degrees: i32) {
        self.rotation = Rotation::from_degrees(degrees);
        self.sync_calibration(false);
    }

    /// Rotation from the signed slider or text input, clamped to `[-180, 180]`.
    pub fn set_rotation_signed(&mut self, value: f64) {
        self.rotation = Rotation::from_signed_input(value);
        self.sync_calibration(false);
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Turn a quarter clockwise.
    ///
    /// Outside the crop tool an active crop follows the image: it is mapped
    /// into image space and back onto the rotated stage. If that mapping
    /// fails the crop is kept as is.
    pub fn rotate_right(&mut self) {
        let next = self.rotation.quarter_turn();
        if let (None, Some(crop)) = (&self.crop_editor, self.crop) {
            let next_stage = compute_stage_box(self.natural, self.viewport, next);
            if let Some(mapped) =
                remap_crop_for_rotation(&crop, self.rotation, &self.stage_box(), next, &next_stage)
            {
                self.crop = Some(mapped);
            }
        }
        self.rotation = next;
        self.sync_calibration(false);
    }

    /// Apply a crop in stage coordinates. Crops without area remove the crop.
    pub fn set_crop(&mut self, crop: Option<CropRect>) {
        self.crop = crop.and_then(|c| c.clamped());
        self.sync_calibration(false);
    }

    pub fn crop(&self) -> Option<CropRect> {
        self.crop
    }

    pub fn stage_box(&self) -> StageBox {
        compute_stage_box(self.natural, self.viewport, self.rotation)
    }

    /// Stage layout while the crop tool is open: the rotated stage shrunk to
    /// fit the viewport.
    pub fn crop_stage_box(&self) -> StageBox {
        fit_stage_box(self.viewport, self.natural, self.rotation)
    }

    /// The crop's axis-aligned box in unrotated image space.
    pub fn crop_image(&self) -> Option<NormRect> {
        let crop = self.crop?;
        stage_crop_to_image(&crop, &self.stage_box(), self.rotation)
    }

    pub fn effective_natural(&self) -> Size {
        effective_natural(self.natural, self.rotation, self.crop.as_ref())
    }

    pub fn effective_aspect(&self) -> f64 {
        effective_aspect(self.effective_natural())
    }

    pub fn aspect_text(&self) -> String {
        aspect_text(self.effective_natural())
    }

    /// Combine the host's measured element rectangles with the current view.
    pub fn pointer_context(
        &self,
        image_rect: ScreenRect,
        image_layout: Size,
        stage_rect: ScreenRect,
    ) -> PointerContext {
        PointerContext {
            image_rect,
            image_layout,
            stage_rect,
            rotation: self.rotation,
            zoom: self.transform.zoom,
            crop: self.crop,
            crop_image: self.crop_image(),
        }
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    /// Pointer pressed on the stage.
    ///
    /// While measuring, a press inside the visible image places a point;
    /// otherwise it starts panning. Returns whether a point was placed.
    pub fn pointer_down(&mut self, pointer: ScreenPoint, ctx: &PointerContext) -> bool {
        if !self.measuring {
            self.pan.start(pointer, self.transform);
            return false;
        }
        match map_pointer(pointer, ctx) {
            Some(point) => self.measurements.add_point(point),
            None => false,
        }
    }

    /// Pointer pressed on an existing measurement point.
    pub fn begin_point_drag(&mut self, index: usize) -> bool {
        self.measuring && self.measurements.begin_drag(index)
    }

    /// Pointer moved over the stage.
    ///
    /// Pans or drags a point, and records the loupe sample. Returns whether
    /// the view transform or a point changed.
    pub fn pointer_move(&mut self, pointer: ScreenPoint, ctx: &PointerContext) -> bool {
        self.loupe.last_sample = loupe_sample_position(pointer, &ctx.stage_rect, self.crop.as_ref())
            .map(|sample| (sample, pointer));

        if let Some(transform) = self.pan.drag_to(pointer) {
            self.transform = transform;
            return true;
        }
        if self.measurements.dragging().is_some() {
            return map_pointer_unbounded(pointer, ctx)
                .is_some_and(|point| self.measurements.drag_to(point));
        }
        false
    }

    pub fn pointer_up(&mut self) {
        self.pan.end();
        self.measurements.end_drag();
    }

    /// Pointer left the stage: ends any drag and hides the loupe.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
        self.loupe.hovering = false;
        self.loupe.last_sample = None;
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.loupe.hovering = hovering;
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_active()
    }

    // ========================================================================
    // Zoom
    // ========================================================================

    pub fn wheel(&mut self, delta_y: f64) {
        self.transform = self.transform.wheel(delta_y, self.config.zoom.wheel_step);
    }

    pub fn zoom_in(&mut self) {
        self.transform = self.transform.zoom_in(self.config.zoom.button_step);
    }

    pub fn zoom_out(&mut self) {
        self.transform = self.transform.zoom_out(self.config.zoom.button_step);
    }

    /// Reset button or double-click: zoom 1, no offset.
    pub fn reset_view(&mut self) {
        self.transform = ViewTransform::identity();
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    // ========================================================================
    // Measurement
    // ========================================================================

    /// Toggle measuring. Points are kept when measuring is turned off.
    pub fn set_measuring(&mut self, measuring: bool) {
        self.measuring = measuring;
        if measuring {
            self.pan.end();
        } else {
            self.measurements.end_drag();
        }
    }

    pub fn is_measuring(&self) -> bool {
        self.measuring
    }

    pub fn set_mode(&mut self, mode: MeasurementMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn measure_state(&self) -> MeasureState {
        self.measurements.state()
    }

    pub fn measurements(&self) -> &MeasureSession {
        &self.measurements
    }

    pub fn undo_point(&mut self) {
        self.measurements.undo();
    }

    pub fn reset_points(&mut self) {
        self.measurements.reset();
    }

    /// Completed segments with their labels for the current mode.
    pub fn segments(&self) -> Vec<Segment> {
        let effective = self.effective_natural();
        let ctx = LabelContext {
            natural: self.natural,
            effective,
            mode: self.mode,
            width_units: self.calibration.width_units(effective_aspect(effective)),
            snap_tolerance: self.config.measurement.snap_tolerance,
        };
        measure_segments(&self.measurements, &ctx)
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn set_calibration_width(&mut self, text: &str) {
        let aspect = self.effective_aspect();
        self.calibration.set_width_text(text, aspect);
    }

    pub fn set_calibration_height(&mut self, text: &str) {
        let aspect = self.effective_aspect();
        self.calibration.set_height_text(text, aspect);
    }

    pub fn begin_calibration_edit(&mut self, field: CalibrationField) {
        self.calibration.begin_edit(field);
    }

    pub fn end_calibration_edit(&mut self, field: CalibrationField) {
        self.calibration.end_edit(field);
    }

    pub fn set_show_side_distance(&mut self, show: bool) {
        self.show_side_distance = show;
    }

    /// Side-distance guide for the pointer, shown in absolute mode only.
    ///
    /// Nothing is reported while the pointer is off the visible image.
    pub fn side_distance_at(
        &self,
        pointer: ScreenPoint,
        ctx: &PointerContext,
    ) -> Option<SideDistance> {
        if !self.show_side_distance || self.mode != MeasurementMode::Absolute {
            return None;
        }
        map_pointer_unbounded(pointer, ctx)?;
        let aspect = self.effective_aspect();
        let stage_pos = stage_normalized(pointer, &ctx.stage_rect)?;
        side_distance(
            stage_pos,
            self.crop.as_ref(),
            self.calibration.width_units(aspect),
            self.calibration.height_units(aspect),
        )
    }

    // ========================================================================
    // Crop tool
    // ========================================================================

    /// Open the crop tool with a draft of the current crop.
    pub fn enter_crop_mode(&mut self) {
        self.pan.end();
        self.measurements.end_drag();
        self.crop_editor = Some(CropEditor::new(self.crop));
    }

    /// Close the crop tool without applying the draft.
    pub fn cancel_crop_mode(&mut self) {
        self.crop_editor = None;
    }

    /// Apply the draft as the crop and close the tool.
    ///
    /// Returns false, leaving the tool open, when the draft is too small.
    pub fn apply_crop(&mut self) -> bool {
        let Some(crop) = self.crop_editor.as_ref().and_then(CropEditor::finish) else {
            return false;
        };
        self.crop_editor = None;
        self.set_crop(Some(crop));
        true
    }

    /// Remove the crop and close the tool.
    pub fn restore_crop(&mut self) {
        self.crop_editor = None;
        self.set_crop(None);
    }

    pub fn is_cropping(&self) -> bool {
        self.crop_editor.is_some()
    }

    pub fn crop_editor(&self) -> Option<&CropEditor> {
        self.crop_editor.as_ref()
    }

    pub fn set_crop_aspect(&mut self, aspect: AspectPreset) {
        let stage = self.crop_stage_box();
        if let Some(editor) = &mut self.crop_editor {
            editor.set_aspect(aspect, &stage);
        }
    }

    /// Pointer pressed on a crop handle; `stage_rect` is the crop stage on screen.
    pub fn crop_pointer_down(
        &mut self,
        handle: CropHandle,
        pointer: ScreenPoint,
        stage_rect: &ScreenRect,
    ) {
        let Some(pos) = stage_normalized(pointer, stage_rect) else {
            return;
        };
        if let Some(editor) = &mut self.crop_editor {
            editor.begin_drag(handle, pos);
        }
    }

    /// Returns whether the draft changed.
    pub fn crop_pointer_move(&mut self, pointer: ScreenPoint, stage_rect: &ScreenRect) -> bool {
        let stage = self.crop_stage_box();
        match (stage_normalized(pointer, stage_rect), &mut self.crop_editor) {
            (Some(pos), Some(editor)) => editor.drag_to(pos, &stage),
            _ => false,
        }
    }

    pub fn crop_pointer_up(&mut self) {
        if let Some(editor) = &mut self.crop_editor {
            editor.end_drag();
        }
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    pub fn set_loupe_enabled(&mut self, enabled: bool) {
        self.loupe.enabled = enabled;
    }

    /// Loupe layout for the last pointer sample, when the loupe is visible.
    pub fn loupe_layout(&self) -> Option<LoupeLayout> {
        if !self.loupe.is_active() {
            return None;
        }
        let (sample, pointer) = self.loupe.last_sample?;
        loupe_layout(
            &self.stage_box(),
            self.transform.zoom,
            sample,
            pointer,
            self.config.loupe.radius,
            self.config.loupe.scale,
        )
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridSettings {
        &mut self.grid
    }

    /// Stage-normalized positions of the vertical and horizontal grid lines.
    ///
    /// Both lists are empty while the grid is hidden.
    pub fn grid_lines(&self) -> (Vec<f64>, Vec<f64>) {
        if !self.grid.visible {
            return (Vec::new(), Vec::new());
        }
        (
            self.grid.vertical_lines(self.crop.as_ref()),
            self.grid.horizontal_lines(self.crop.as_ref()),
        )
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            version: SNAPSHOT_VERSION,
            rotation: self.rotation,
            crop: self.crop,
            transform: self.transform,
            points: self.measurements.points().to_vec(),
            mode: self.mode,
            calibration_width: self.calibration.width_text().to_string(),
            calibration_height: self.calibration.height_text().to_string(),
        }
    }

    /// Replace the persisted part of the state with `snapshot`.
    ///
    /// Values are re-validated: the crop is clamped, the zoom clamped and
    /// invalid points dropped.
    pub fn restore(&mut self, snapshot: &ViewerSnapshot) {
        self.rotation = snapshot.rotation;
        self.set_crop(snapshot.crop);
        self.transform = ViewTransform::new(
            snapshot.transform.zoom,
            snapshot.transform.offset_x,
            snapshot.transform.offset_y,
        );
        self.measurements = MeasureSession::from_points(snapshot.points.iter().copied());
        self.mode = snapshot.mode;
        self.calibration = Calibration::from_texts(
            snapshot.calibration_width.clone(),
            snapshot.calibration_height.clone(),
        );
        self.synced_canvas = Some(self.effective_natural());
        self.crop_editor = None;
        self.pan.end();
    }

    /// Store the current state under the image key.
    pub fn save_to(&self, repo: &mut impl SessionRepository) -> Result<(), SessionError> {
        let key = self.image_key.as_deref().ok_or(SessionError::NoImage)?;
        repo.save(key, &self.snapshot())
    }

    /// Restore the state stored under the image key.
    ///
    /// Returns `Ok(false)` when nothing was stored for this image.
    pub fn restore_from(&mut self, repo: &impl SessionRepository) -> Result<bool, SessionError> {
        let key = self.image_key.as_deref().ok_or(SessionError::NoImage)?;
        match repo.load(key)? {
            Some(snapshot) => {
                log::info!("Restoring viewer state for {}", key);
                self.restore(&snapshot);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
