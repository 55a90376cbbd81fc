//! Render contract
//!
//! [`view`] turns a snapshot into an ordered list of draw commands in
//! screen coordinates (camera already applied). Hosts replay the list in
//! order; nothing here touches a canvas.

use glam::Vec2;

use crate::sim::{Eggnemy, Model, Timer, overlaps};

/// Palette used by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
    Gray,
    Red,
}

impl Color {
    pub fn as_css(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Gray => "gray",
            Color::Red => "red",
        }
    }
}

/// Entity artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Egg,
    Eggnemy,
    Boss,
}

impl Sprite {
    /// Image path, relative to the page
    pub fn src(self) -> &'static str {
        match self {
            Sprite::Egg => "resources/egg.png",
            Sprite::Eggnemy => "resources/eggnemy.png",
            Sprite::Boss => "resources/boss.png",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    OutlinedRect {
        pos: Vec2,
        size: Vec2,
        color: Color,
        line_width: f32,
    },
    SolidRect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    /// Sprite drawn with its top-left corner at `pos`, scaled to `size`
    Image {
        pos: Vec2,
        size: Vec2,
        sprite: Sprite,
    },
    /// Text centered horizontally on `pos.x`
    Text {
        pos: Vec2,
        text: String,
        color: Color,
        font_size: f32,
    },
}

const LABEL_SIZE: f32 = 8.0;
const HUD_SIZE: f32 = 15.0;
const BOARD_SIZE: f32 = 10.0;
const MENU_SIZE: Vec2 = Vec2::new(300.0, 150.0);

fn text(pos: Vec2, text: impl Into<String>, color: Color, font_size: f32) -> DrawCommand {
    DrawCommand::Text {
        pos,
        text: text.into(),
        color,
        font_size,
    }
}

/// Leaderboard row: `Top 1  mm:ss`, then `    2  mm:ss`, or `-- : --`
pub fn leaderboard_row(rank: usize, entry: Option<&Timer>) -> String {
    let label = if rank == 1 {
        "Top 1".to_string()
    } else {
        format!("    {rank}")
    };
    let time = entry.map_or_else(|| "-- : --".to_string(), Timer::padded);
    format!("{label}  {time}")
}

/// Draw list for one frame
pub fn view(model: &Model) -> Vec<DrawCommand> {
    let world = &model.world;
    let screen = Vec2::new(world.width, world.height);
    let mut commands = vec![DrawCommand::Clear { color: Color::Black }];

    commands.push(DrawCommand::OutlinedRect {
        pos: world.to_screen(Vec2::ZERO),
        size: Vec2::new(model.config.world_width, model.config.world_height),
        color: Color::White,
        line_width: 2.0,
    });

    for boss in model.bosses.iter().filter(|b| overlaps(*b, world)) {
        push_hostile(&mut commands, model, boss, Sprite::Boss, Color::White);
    }

    let egg = &model.egg;
    let egg_pos = world.to_screen(egg.pos);
    commands.push(DrawCommand::Image {
        pos: egg_pos,
        size: egg.size,
        sprite: Sprite::Egg,
    });
    commands.push(text(
        egg_pos + Vec2::new(egg.size.x / 2.0, egg.size.y + 15.0),
        format!("{}/{}", egg.hp, egg.max_hp),
        Color::White,
        LABEL_SIZE,
    ));

    for eggnemy in model.eggnemies.iter().filter(|e| overlaps(*e, world)) {
        push_hostile(&mut commands, model, eggnemy, Sprite::Eggnemy, Color::Gray);
    }

    // HUD
    commands.push(text(
        Vec2::new(screen.x - 40.0, 25.0),
        model.timer.to_string(),
        Color::White,
        HUD_SIZE,
    ));
    commands.push(text(
        Vec2::new(30.0, 25.0),
        model.defeated_eggnemies.to_string(),
        Color::White,
        HUD_SIZE,
    ));

    let rows_y = screen.y - 70.0;
    for rank in 1..=crate::leaderboard::MAX_LEADERBOARD_ENTRIES {
        commands.push(text(
            Vec2::new(90.0, rows_y + (rank - 1) as f32 * 20.0),
            leaderboard_row(rank, model.leaderboard.get(rank - 1)),
            Color::White,
            BOARD_SIZE,
        ));
    }

    let stats = [
        format!("LV    {}", egg.level),
        format!("ATK   {}", egg.attack),
        format!("SPD   {}", egg.speed),
        format!("EXP   {}", egg.eggxperience),
    ];
    let stats_y = screen.y - 90.0;
    for (i, line) in stats.into_iter().enumerate() {
        commands.push(text(
            Vec2::new(screen.x - 70.0, stats_y + i as f32 * 20.0),
            line,
            Color::White,
            BOARD_SIZE,
        ));
    }

    if !model.is_game_over && egg.level_up {
        push_level_up_menu(&mut commands, screen);
    }

    if model.is_game_over {
        let above = egg_pos + Vec2::new(egg.size.x / 2.0, -10.0);
        let below = egg_pos + Vec2::new(egg.size.x / 2.0, egg.size.y + 30.0);
        commands.push(text(above, "GAME OVER", Color::Red, BOARD_SIZE));
        commands.push(text(below, "Restart? [R]", Color::White, BOARD_SIZE));
    }

    commands
}

fn push_hostile(
    commands: &mut Vec<DrawCommand>,
    model: &Model,
    hostile: &Eggnemy,
    sprite: Sprite,
    label: Color,
) {
    let pos = model.world.to_screen(hostile.pos);
    commands.push(DrawCommand::Image {
        pos,
        size: hostile.size,
        sprite,
    });
    commands.push(text(
        pos + Vec2::new(hostile.size.x / 2.0, hostile.size.y + 15.0),
        format!("{}/{}", hostile.hp, hostile.max_hp),
        label,
        LABEL_SIZE,
    ));
}

fn push_level_up_menu(commands: &mut Vec<DrawCommand>, screen: Vec2) {
    let center = screen / 2.0;
    let corner = center - Vec2::new(MENU_SIZE.x / 2.0, 100.0);
    commands.push(DrawCommand::SolidRect {
        pos: corner,
        size: MENU_SIZE,
        color: Color::Black,
    });
    commands.push(DrawCommand::OutlinedRect {
        pos: corner,
        size: MENU_SIZE,
        color: Color::White,
        line_width: 3.0,
    });
    commands.push(text(center - Vec2::new(0.0, 50.0), "LEVEL UP", Color::White, 25.0));

    let choices = ["[1] Increase HP", "[2] Increase ATK", "[3] Increase SPD"];
    for (i, choice) in choices.into_iter().enumerate() {
        let y = -20.0 + i as f32 * 20.0;
        commands.push(text(center + Vec2::new(0.0, y), choice, Color::White, HUD_SIZE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::tests::sample;

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn model() -> Model {
        Model::new(&sample(), Vec::new())
    }

    #[test]
    fn test_leaderboard_rows() {
        let t = Timer { minutes: 1, seconds: 5 };
        assert_eq!(leaderboard_row(1, Some(&t)), "Top 1  01:05");
        assert_eq!(leaderboard_row(2, None), "    2  -- : --");
    }

    #[test]
    fn test_frame_starts_with_clear_and_outline() {
        let commands = view(&model());
        assert_eq!(commands[0], DrawCommand::Clear { color: Color::Black });
        let DrawCommand::OutlinedRect { pos, size, .. } = &commands[1] else {
            panic!("expected play-area outline, got {:?}", commands[1]);
        };
        let m = model();
        assert_eq!(*pos, Vec2::new(-m.world.x, -m.world.y));
        assert_eq!(*size, Vec2::new(m.config.world_width, m.config.world_height));
    }

    #[test]
    fn test_hud_labels() {
        let mut m = model();
        m.timer = Timer { minutes: 3, seconds: 7 };
        m.defeated_eggnemies = 12;
        m.egg.eggxperience = 12;
        let commands = view(&m);
        let labels = texts(&commands);

        assert!(labels.contains(&"3:07"));
        assert!(labels.contains(&"12"));
        assert!(labels.contains(&"Top 1  -- : --"));
        assert!(labels.contains(&"EXP   12"));
        assert!(labels.contains(&format!("{}/{}", m.egg.hp, m.egg.max_hp).as_str()));
        assert!(!labels.contains(&"LEVEL UP"));
        assert!(!labels.contains(&"GAME OVER"));
    }

    #[test]
    fn test_level_up_menu_and_game_over() {
        let mut m = model();
        m.egg.level_up = true;
        let leveling = view(&m);
        assert!(texts(&leveling).contains(&"[2] Increase ATK"));

        m.is_game_over = true;
        let over = view(&m);
        let labels = texts(&over);
        assert!(labels.contains(&"GAME OVER"));
        assert!(labels.contains(&"Restart? [R]"));
        assert!(!labels.contains(&"LEVEL UP"));
    }

    #[test]
    fn test_entities_in_screen_space_and_culled() {
        let mut m = model();
        let near = Eggnemy {
            id: 1,
            pos: Vec2::new(m.world.x + 10.0, m.world.y + 20.0),
            size: Vec2::new(17.0, 30.0),
            vel: Vec2::ZERO,
            hp: 3,
            max_hp: 5,
            attack: 1,
            speed: 1.0,
        };
        let far = Eggnemy {
            id: 2,
            pos: Vec2::new(m.world.x + m.world.width + 100.0, m.world.y),
            ..near.clone()
        };
        m.eggnemies = vec![near, far];

        let images: Vec<_> = view(&m)
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Image {
                    pos,
                    sprite: Sprite::Eggnemy,
                    ..
                } => Some(pos),
                _ => None,
            })
            .collect();
        assert_eq!(images, vec![Vec2::new(10.0, 20.0)]);
    }
}
