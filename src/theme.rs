//! Space-theme visuals.
//!
//! Everything is drawn from one procedurally generated anti-aliased
//! circle texture, tinted and stretched per sprite. The sim spawns bare
//! logic entities tagged with [`Skin`]; `dress_skins` attaches the right
//! body and decoration layers when the render assets exist. Headless
//! test apps never add this plugin, so skins simply stay bare there.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;

use crate::asset_loader::CustomAssets;
use crate::config::RunnerConfig;
use crate::runner::components::{RestartControl, Skin, StartControl};
use crate::runner::input::UiRegions;
use crate::runner::session::{FrameClock, RunnerSession};
use crate::AppState;

pub struct ThemePlugin;

impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, init_sprite_assets);
        app.add_systems(Startup, spawn_ui);
        // Uploaded artwork must land in `CustomAssets` before skins are
        // dressed, or a pre-init upload misses the startup actors.
        app.add_systems(
            Update,
            (
                dress_skins.after(crate::asset_loader::process_uploads),
                update_hud,
                wag_tails,
                update_cursor_icon,
            ),
        );
        app.add_systems(
            Update,
            fade_instructions.run_if(in_state(AppState::Playing)),
        );
        app.add_systems(OnEnter(AppState::GameOver), spawn_game_over_banner);
        app.add_systems(OnExit(AppState::GameOver), despawn_game_over_banner);
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

pub mod palette {
    use bevy::prelude::Color;

    pub const SPACE_BG: Color = Color::srgb(0.03, 0.02, 0.1);
    pub const GROUND_DUST: Color = Color::srgb(0.45, 0.38, 0.32);
    pub const SUIT_WHITE: Color = Color::srgb(0.92, 0.93, 0.96);
    pub const VISOR_BLUE: Color = Color::srgb(0.2, 0.45, 0.85);
    pub const DOG_TAN: Color = Color::srgb(0.85, 0.65, 0.35);
    pub const ROCK_GRAY: Color = Color::srgb(0.5, 0.45, 0.42);
    pub const FLAME_ORANGE: Color = Color::srgb(1.0, 0.55, 0.1);
    pub const FLAME_YELLOW: Color = Color::srgb(1.0, 0.85, 0.3);
    pub const HULL_SILVER: Color = Color::srgb(0.7, 0.75, 0.8);
    pub const DOME_GREEN: Color = Color::srgba(0.4, 0.95, 0.6, 0.6);
    pub const ALIEN_GREEN: Color = Color::srgb(0.3, 0.8, 0.35);
    pub const UI_GOLD: Color = Color::srgb(0.95, 0.8, 0.25);
    pub const UI_RED: Color = Color::srgb(0.9, 0.25, 0.2);
    pub const TEXT_MAIN: Color = Color::srgb(0.95, 0.95, 0.95);
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Procedural shape textures shared by every sprite.
#[derive(Resource, Clone)]
pub struct SpriteAssets {
    /// 64x64 anti-aliased white circle, tinted via `Sprite::color`.
    pub circle: Handle<Image>,
}

fn init_sprite_assets(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let circle = create_circle_texture(&mut images);
    commands.insert_resource(SpriteAssets { circle });
}

fn disc(assets: &SpriteAssets, color: Color, size: Vec2) -> Sprite {
    Sprite {
        image: assets.circle.clone(),
        color,
        custom_size: Some(size),
        ..default()
    }
}

fn slab(color: Color, size: Vec2) -> Sprite {
    Sprite {
        color,
        custom_size: Some(size),
        ..default()
    }
}

// ---------------------------------------------------------------------------
// Skin dressing
// ---------------------------------------------------------------------------

/// Oscillating child sprite (the dog's tail).
#[derive(Component)]
struct TailWag {
    timer: f32,
}

/// Attach body sprites to freshly spawned skinned entities. Sizes are in
/// unscaled sprite pixels; the owner's transform scale shrinks them to
/// screen size, keeping visuals and colliders in the same space.
fn dress_skins(
    mut commands: Commands,
    assets: Option<Res<SpriteAssets>>,
    custom: Option<Res<CustomAssets>>,
    cfg: Res<RunnerConfig>,
    newly_skinned: Query<(Entity, &Skin), Added<Skin>>,
) {
    let Some(assets) = assets else { return };

    // Uploaded artwork replaces the procedural body for that role.
    let override_sprite = |role: &str, size: Vec2| -> Option<Sprite> {
        let image = custom.as_ref()?.sprites.get(role)?.clone();
        Some(Sprite {
            image,
            custom_size: Some(size),
            ..default()
        })
    };

    for (entity, skin) in &newly_skinned {
        let mut ec = commands.entity(entity);
        match skin {
            Skin::Player => {
                if let Some(sprite) = override_sprite("player", Vec2::new(480.0, 520.0)) {
                    ec.insert(sprite);
                    continue;
                }
                ec.insert(disc(&assets, palette::SUIT_WHITE, Vec2::new(480.0, 520.0)));
                ec.with_children(|parent| {
                    // Visor
                    parent.spawn((
                        disc(&assets, palette::VISOR_BLUE, Vec2::new(260.0, 200.0)),
                        Transform::from_xyz(70.0, 90.0, 0.1),
                    ));
                    // Backpack
                    parent.spawn((
                        slab(palette::HULL_SILVER, Vec2::new(140.0, 260.0)),
                        Transform::from_xyz(-200.0, 30.0, -0.1),
                    ));
                });
            }
            Skin::Companion => {
                if let Some(sprite) = override_sprite("companion", Vec2::new(420.0, 320.0)) {
                    ec.insert(sprite);
                    continue;
                }
                ec.insert(disc(&assets, palette::DOG_TAN, Vec2::new(420.0, 320.0)));
                ec.with_children(|parent| {
                    // Snout
                    parent.spawn((
                        disc(&assets, palette::SUIT_WHITE, Vec2::new(140.0, 110.0)),
                        Transform::from_xyz(160.0, -20.0, 0.1),
                    ));
                    // Ear
                    parent.spawn((
                        disc(&assets, palette::GROUND_DUST, Vec2::new(90.0, 160.0)),
                        Transform::from_xyz(60.0, 150.0, 0.1),
                    ));
                    // Tail
                    parent.spawn((
                        disc(&assets, palette::DOG_TAN, Vec2::new(60.0, 180.0)),
                        Transform::from_xyz(-200.0, 80.0, -0.1),
                        TailWag { timer: 0.0 },
                    ));
                });
            }
            Skin::Meteor => {
                // Rock core sits left of the origin, matching the collider;
                // the flame trail sweeps off to the right. No body sprite on
                // the origin itself.
                ec.with_children(|parent| {
                    parent.spawn((
                        disc(&assets, palette::ROCK_GRAY, Vec2::new(280.0, 280.0)),
                        Transform::from_xyz(-90.0, 0.0, 0.1),
                    ));
                    parent.spawn((
                        disc(&assets, palette::FLAME_ORANGE, Vec2::new(420.0, 180.0)),
                        Transform::from_xyz(160.0, 40.0, 0.0),
                    ));
                    parent.spawn((
                        disc(&assets, palette::FLAME_YELLOW, Vec2::new(260.0, 110.0)),
                        Transform::from_xyz(240.0, 70.0, 0.05),
                    ));
                });
            }
            Skin::Saucer => {
                ec.insert(disc(&assets, palette::ALIEN_GREEN, Vec2::new(300.0, 300.0)));
                ec.with_children(|parent| {
                    // Hull, matching the secondary collider region.
                    parent.spawn((
                        disc(&assets, palette::HULL_SILVER, Vec2::new(620.0, 160.0)),
                        Transform::from_xyz(0.0, 40.0, 0.2),
                    ));
                    parent.spawn((
                        disc(&assets, palette::DOME_GREEN, Vec2::new(260.0, 180.0)),
                        Transform::from_xyz(0.0, 120.0, 0.3),
                    ));
                });
            }
            Skin::Ground => {
                let backdrop = match custom.as_ref().and_then(|c| c.background.clone()) {
                    Some(image) => Sprite {
                        image,
                        custom_size: Some(Vec2::new(cfg.half_width * 4.0, cfg.half_height * 2.0)),
                        ..default()
                    },
                    None => slab(
                        palette::SPACE_BG,
                        Vec2::new(cfg.half_width * 4.0, cfg.half_height * 2.0),
                    ),
                };
                ec.insert(backdrop);
                ec.with_children(|parent| {
                    parent.spawn((
                        slab(
                            palette::GROUND_DUST,
                            Vec2::new(cfg.half_width * 4.0, 60.0),
                        ),
                        Transform::from_xyz(0.0, cfg.ground_y - 60.0, 0.1),
                    ));
                });
            }
        }
    }
}

fn wag_tails(time: Res<Time>, mut tails: Query<(&mut Transform, &mut TailWag)>) {
    let dt = time.delta_secs();
    for (mut tf, mut wag) in &mut tails {
        wag.timer += dt * 8.0;
        tf.rotation = Quat::from_rotation_z(wag.timer.sin() * 0.4);
    }
}

// ---------------------------------------------------------------------------
// HUD and menu controls
// ---------------------------------------------------------------------------

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct InstructionText;

#[derive(Component)]
struct GameOverBanner;

fn spawn_ui(mut commands: Commands, assets: Res<SpriteAssets>, regions: Res<UiRegions>) {
    commands.spawn((
        Text::new("Score: 0"),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(palette::TEXT_MAIN),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(20.0),
            ..default()
        },
        ScoreText,
    ));

    commands.spawn((
        Text::new("(press SPACE to jump)"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(palette::TEXT_MAIN.with_alpha(0.0)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(48.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        InstructionText,
    ));

    // Start control: visible in Init, hidden by reset.
    commands
        .spawn((
            disc(&assets, palette::UI_GOLD, regions.start.size()),
            Transform::from_translation(regions.start.center().extend(2.0)),
            Visibility::Inherited,
            StartControl,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text2d::new("START"),
                TextFont {
                    font_size: 42.0,
                    ..default()
                },
                TextColor(palette::SPACE_BG),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
        });

    // Restart control: revealed by the game-over flow.
    commands
        .spawn((
            disc(&assets, palette::UI_RED, regions.restart.size()),
            Transform::from_translation(regions.restart.center().extend(2.0)),
            Visibility::Hidden,
            RestartControl,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text2d::new("PLAY\nAGAIN"),
                TextFont {
                    font_size: 34.0,
                    ..default()
                },
                TextColor(palette::TEXT_MAIN),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
        });

    // The logo shown above it is clickable too.
    commands
        .spawn((
            disc(&assets, palette::DOME_GREEN, regions.restart_logo.size()),
            Transform::from_translation(regions.restart_logo.center().extend(2.0)),
            Visibility::Hidden,
            RestartControl,
        ))
        .with_children(|parent| {
            parent.spawn((
                disc(&assets, palette::UI_GOLD, regions.restart_logo.size() * 0.55),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
            parent.spawn((
                Text2d::new("COMET\nDASH"),
                TextFont {
                    font_size: 26.0,
                    ..default()
                },
                TextColor(palette::SPACE_BG),
                Transform::from_xyz(0.0, 0.0, 0.2),
            ));
        });
}

/// Hand cursor over whichever control is currently clickable.
fn update_cursor_icon(
    mut commands: Commands,
    state: Res<State<AppState>>,
    regions: Res<UiRegions>,
    session: Res<RunnerSession>,
    windows: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut was_hovering: Local<bool>,
) {
    let Ok((entity, window)) = windows.get_single() else {
        return;
    };
    let hovering = window
        .cursor_position()
        .map(|pos| {
            let point = Vec2::new(
                pos.x - window.width() / 2.0,
                window.height() / 2.0 - pos.y,
            );
            match state.get() {
                AppState::Init => regions.start.contains(point),
                AppState::GameOver => session.reveal_done && regions.restart_hit(point),
                AppState::Playing => false,
            }
        })
        .unwrap_or(false);

    if hovering != *was_hovering {
        *was_hovering = hovering;
        let icon = if hovering {
            SystemCursorIcon::Pointer
        } else {
            SystemCursorIcon::Default
        };
        commands.entity(entity).insert(CursorIcon::System(icon));
    }
}

fn update_hud(session: Res<RunnerSession>, mut texts: Query<&mut Text, With<ScoreText>>) {
    for mut text in &mut texts {
        **text = format!("Score: {}", session.score);
    }
}

/// Fade the jump hint in and out over the first ~100 ticks of a run.
fn fade_instructions(
    clock: Res<FrameClock>,
    session: Res<RunnerSession>,
    mut texts: Query<&mut TextColor, With<InstructionText>>,
) {
    const SHOW: u64 = 100;
    const FADE: u64 = 30;

    let since_start = clock.frame.saturating_sub(session.game_start_frame);
    let alpha = if since_start >= SHOW {
        0.0
    } else if since_start < FADE {
        since_start as f32 / FADE as f32
    } else if since_start > SHOW - FADE {
        (SHOW - since_start) as f32 / FADE as f32
    } else {
        1.0
    };

    for mut color in &mut texts {
        *color = TextColor(palette::TEXT_MAIN.with_alpha(alpha * 0.7));
    }
}

fn spawn_game_over_banner(mut commands: Commands, session: Res<RunnerSession>) {
    commands.spawn((
        Text::new(format!(
            "GAME OVER\nScore: {}   Cleared: {}",
            session.score, session.obstacles_cleared
        )),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextColor(palette::UI_RED),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(20.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        GameOverBanner,
    ));
}

fn despawn_game_over_banner(mut commands: Commands, banners: Query<Entity, With<GameOverBanner>>) {
    for entity in &banners {
        commands.entity(entity).despawn_recursive();
    }
}

// ---------------------------------------------------------------------------
// Procedural texture generation
// ---------------------------------------------------------------------------

/// 64x64 anti-aliased white circle; tinting happens at draw time through
/// `Sprite::color`, so one texture serves every shape in the game.
fn create_circle_texture(images: &mut Assets<Image>) -> Handle<Image> {
    let size: u32 = 64;
    let mut data = vec![0u8; (size * size * 4) as usize];
    let center = size as f32 / 2.0;
    let radius = center - 1.0;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center + 0.5;
            let dy = y as f32 - center + 0.5;
            let dist = (dx * dx + dy * dy).sqrt();
            let idx = ((y * size + x) * 4) as usize;

            if dist <= radius {
                let alpha = if dist > radius - 1.5 {
                    ((radius - dist) / 1.5 * 255.0) as u8
                } else {
                    255
                };
                data[idx] = 255;
                data[idx + 1] = 255;
                data[idx + 2] = 255;
                data[idx + 3] = alpha;
            }
        }
    }

    images.add(Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    ))
}
