//! Custom asset upload bridge: the embedding shell can swap in its own
//! PNG/JPG artwork at runtime (decoded to raw RGBA on the JS side).
//!
//! Uploads land in a static pending queue from the wasm-bindgen exports
//! and a Bevy system drains them into [`CustomAssets`]; the theme layer
//! prefers an uploaded background over the flat procedural one.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use std::collections::HashMap;
use std::sync::Mutex;
use wasm_bindgen::prelude::*;

pub struct AssetLoaderPlugin;

impl Plugin for AssetLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CustomAssets>();
        app.add_systems(Update, process_uploads);
    }
}

/// Custom artwork uploaded by the shell at runtime.
#[derive(Resource, Default)]
pub struct CustomAssets {
    /// Sprite overrides keyed by role (e.g. `"player"`, `"companion"`).
    pub sprites: HashMap<String, Handle<Image>>,
    /// Optional custom backdrop.
    pub background: Option<Handle<Image>>,
}

struct PendingUpload {
    role: String,
    is_background: bool,
    data: Vec<u8>,
    width: u32,
    height: u32,
}

static PENDING_UPLOADS: Mutex<Vec<PendingUpload>> = Mutex::new(Vec::new());

/// Upload an RGBA sprite image for a given role.
///
/// `rgba` is raw pixel data, 4 bytes per pixel, `width * height` pixels.
#[wasm_bindgen]
pub fn upload_sprite(role: &str, width: u32, height: u32, rgba: &[u8]) {
    if let Ok(mut queue) = PENDING_UPLOADS.lock() {
        queue.push(PendingUpload {
            role: role.to_string(),
            is_background: false,
            data: rgba.to_vec(),
            width,
            height,
        });
    }
}

/// Upload an RGBA image to use as the backdrop.
#[wasm_bindgen]
pub fn upload_background(width: u32, height: u32, rgba: &[u8]) {
    if let Ok(mut queue) = PENDING_UPLOADS.lock() {
        queue.push(PendingUpload {
            role: "background".to_string(),
            is_background: true,
            data: rgba.to_vec(),
            width,
            height,
        });
    }
}

pub(crate) fn process_uploads(mut custom: ResMut<CustomAssets>, mut images: ResMut<Assets<Image>>) {
    let uploads: Vec<PendingUpload> = match PENDING_UPLOADS.lock() {
        Ok(mut queue) => queue.drain(..).collect(),
        Err(_) => return,
    };

    for upload in uploads {
        if upload.data.len() != (upload.width * upload.height * 4) as usize {
            warn!(
                "dropping upload '{}': byte count does not match {}x{} RGBA",
                upload.role, upload.width, upload.height
            );
            continue;
        }
        let image = Image::new(
            Extent3d {
                width: upload.width,
                height: upload.height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            upload.data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::RENDER_WORLD,
        );
        let handle = images.add(image);
        if upload.is_background {
            custom.background = Some(handle);
        } else {
            custom.sprites.insert(upload.role, handle);
        }
    }
}
