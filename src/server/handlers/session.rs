//! Session handlers: Load, SetCamera, Resize, GetState, GetColors, Close

use glam::{Mat4, Vec3};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::category::Category;
use crate::codec::{base64_to_bytes, bytes_to_base64, encode_elements, positions_from_floats, to_typed_view, Endian};
use crate::interaction::{LassoState, Viewport};
use crate::palette::{point_colors, Rgb};
use crate::selection::CameraProjector;
use crate::server::protocol::{error_codes, Response};
use crate::server::state::{SessionState, DEFAULT_MISSING_COLOR};
use crate::server::util::parse_params;
use crate::store::StoreValue;

fn no_data(id: Option<serde_json::Value>) -> Response {
    Response::error(id, error_codes::NO_DATA_LOADED, "No data loaded. Call Load first.".to_string())
}

/// Handle Load request - decodes positions and builds the category
pub fn handle_load(state: &mut SessionState, id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    #[derive(Deserialize)]
    struct LoadParams {
        xyz: String,
        values: Vec<Option<String>>,
        #[serde(default)]
        labels: Option<Vec<String>>,
        #[serde(default)]
        colors: Option<Vec<Rgb>>,
        #[serde(default)]
        missing_color: Option<Rgb>,
    }

    let p: LoadParams = match parse_params(id.clone(), params, "{xyz, values, labels?, colors?, missing_color?}") {
        Ok(p) => p,
        Err(e) => return e,
    };

    let xyz_bytes = match base64_to_bytes(&p.xyz) {
        Ok(bytes) => bytes,
        Err(e) => return Response::error(id, error_codes::INVALID_DATA, format!("xyz: {}", e)),
    };
    let positions = match to_typed_view::<f32>(&xyz_bytes, Endian::Little)
        .and_then(|floats| positions_from_floats(&floats).map(|p| p.to_vec()))
    {
        Ok(positions) => positions,
        Err(e) => return Response::error(id, error_codes::INVALID_DATA, format!("xyz: {}", e)),
    };

    if p.values.len() != positions.len() {
        return Response::error(
            id,
            error_codes::INVALID_DATA,
            format!("{} values for {} points", p.values.len(), positions.len()),
        );
    }

    let values: Vec<Option<&str>> = p.values.iter().map(|v| v.as_deref()).collect();
    let category = match Category::new("category", &values, p.labels) {
        Ok(category) => category,
        Err(e) => return Response::error(id, error_codes::INVALID_DATA, e.to_string()),
    };

    let keys = state.config.keys.clone();
    let palette = p.colors.unwrap_or_default();
    let missing_color = p.missing_color.unwrap_or(DEFAULT_MISSING_COLOR);

    state.store.set_remote(&keys.positions, StoreValue::Bytes(xyz_bytes));
    state.store.set_remote(&keys.colors, StoreValue::Json(json!(palette)));
    state.store.set_remote(&keys.missing_color, StoreValue::Json(json!(missing_color)));
    category.sync_to_store(&mut state.store, &keys);

    info!(
        "Loaded {} points, {} labels, {} unassigned",
        positions.len(),
        category.label_list().len(),
        category.num_unassigned()
    );

    let result = json!({
        "num_points": positions.len(),
        "labels": category.label_list(),
        "num_unassigned": category.num_unassigned(),
    });

    state.positions = positions;
    state.category = Some(category);
    state.palette = palette;
    state.missing_color = missing_color;
    state.interaction.cancel();

    Response::success(id, result)
}

/// Handle SetCamera request - either a look-at camera or a raw matrix
pub fn handle_set_camera(state: &mut SessionState, id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CameraParams {
        Matrix {
            matrix: [f32; 16],
        },
        LookAt {
            eye: [f32; 3],
            target: [f32; 3],
            fov_y_degrees: f32,
            aspect: f32,
            near: f32,
            far: f32,
        },
    }

    let p: CameraParams = match parse_params(
        id.clone(),
        params,
        "{matrix} or {eye, target, fov_y_degrees, aspect, near, far}",
    ) {
        Ok(p) => p,
        Err(e) => return e,
    };

    state.projector = match p {
        CameraParams::Matrix { matrix } => CameraProjector::new(Mat4::from_cols_array(&matrix)),
        CameraParams::LookAt {
            eye,
            target,
            fov_y_degrees,
            aspect,
            near,
            far,
        } => {
            if !(near > 0.0 && far > near && aspect > 0.0 && fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
                return Response::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Camera needs 0 < near < far, aspect > 0 and 0 < fov_y_degrees < 180".to_string(),
                );
            }
            CameraProjector::look_at(
                Vec3::from_array(eye),
                Vec3::from_array(target),
                fov_y_degrees.to_radians(),
                aspect,
                near,
                far,
            )
        }
    };

    Response::success(id, json!({ "status": "ok" }))
}

/// Handle Resize request - updates surface size and pixel ratio
pub fn handle_resize(state: &mut SessionState, id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    fn default_ratio() -> f32 {
        1.0
    }

    #[derive(Deserialize)]
    struct ResizeParams {
        width: f32,
        height: f32,
        #[serde(default = "default_ratio")]
        pixel_ratio: f32,
    }

    let p: ResizeParams = match parse_params(id.clone(), params, "{width, height, pixel_ratio?}") {
        Ok(p) => p,
        Err(e) => return e,
    };
    if !(p.width > 0.0 && p.height > 0.0 && p.pixel_ratio > 0.0) {
        return Response::error(id, error_codes::INVALID_PARAMS, "Surface size and pixel ratio must be positive".to_string());
    }

    let viewport = Viewport {
        pixel_ratio: p.pixel_ratio,
        pixel_width: (p.width * p.pixel_ratio).round().max(1.0) as u32,
        pixel_height: (p.height * p.pixel_ratio).round().max(1.0) as u32,
    };
    state.surface_size = (p.width, p.height);
    state.interaction.resize(viewport);

    Response::from_serializable(id, &viewport)
}

/// Handle GetState request - interaction, overlay and commit bookkeeping
pub fn handle_get_state(state: &SessionState, id: Option<serde_json::Value>) -> Response {
    let lasso_kind = match state.interaction.lasso() {
        LassoState::Idle => "idle",
        LassoState::Drawing { .. } => "drawing",
        LassoState::Ready { .. } => "ready",
    };

    let result = json!({
        "mode": state.interaction.mode(),
        "lasso": {
            "kind": lasso_kind,
            "num_points": state.interaction.lasso().points().len(),
        },
        "overlay": state.interaction.overlay_path(),
        "viewport": state.interaction.viewport(),
        "loaded": state.is_loaded(),
        "num_points": state.positions.len(),
        "num_unassigned": state.category.as_ref().map(|c| c.num_unassigned()),
        "pending": state.protocol.pending().collect::<Vec<_>>(),
        "last_result": state.last_result,
    });
    Response::success(id, result)
}

/// Handle GetColors request - per-point RGB as base64 f32 LE
pub fn handle_get_colors(state: &SessionState, id: Option<serde_json::Value>) -> Response {
    let Some(category) = &state.category else {
        return no_data(id);
    };

    match point_colors(category.coded_values(), &state.palette, state.missing_color) {
        Ok(colors) => Response::success(
            id,
            json!({
                "num_points": category.len(),
                "colors": bytes_to_base64(&encode_elements(&colors, Endian::Little)),
            }),
        ),
        Err(e) => Response::error(id, error_codes::INVALID_DATA, e.to_string()),
    }
}

/// Handle Close request - drops all session data
pub fn handle_close(state: &mut SessionState, id: Option<serde_json::Value>) -> Response {
    state.reset();
    info!("Session closed");
    Response::success(id, json!({ "status": "ok" }))
}
