//! Egg Survivor entry point
//!
//! The browser build fetches `settings.json`, ticks the session on a timer
//! and paints the draw list on a 2D canvas. The native build is a headless
//! runner: the autopilot plays one session and the outcome is logged.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Response};

    use egg_survivor::Settings;
    use egg_survivor::audio::AudioManager;
    use egg_survivor::leaderboard::LocalStorageStore;
    use egg_survivor::session::Session;
    use egg_survivor::sim::Key;
    use egg_survivor::view::{DrawCommand, Sprite};

    /// Game instance holding all state
    struct Game {
        session: Session,
        audio: AudioManager,
        ctx: CanvasRenderingContext2d,
        sprites: [(Sprite, HtmlImageElement); 3],
    }

    impl Game {
        fn tick(&mut self) {
            let Game { session, audio, .. } = self;
            audio.play_events(session.tick());
            self.render();
        }

        fn key_down(&mut self, key: &str) {
            let Game { session, audio, .. } = self;
            if key.eq_ignore_ascii_case("m") {
                audio.set_muted(!audio.is_muted());
                log::info!("Sound {}", if audio.is_muted() { "off" } else { "on" });
                return;
            }
            audio.play_events(session.key_down(key));
            self.render();
        }

        fn sprite(&self, sprite: Sprite) -> Option<&HtmlImageElement> {
            self.sprites
                .iter()
                .find(|(s, img)| *s == sprite && img.complete())
                .map(|(_, img)| img)
        }

        /// Replay the draw list on the canvas
        fn render(&self) {
            let ctx = &self.ctx;
            for command in self.session.view() {
                match command {
                    DrawCommand::Clear { color } => {
                        let canvas = ctx.canvas();
                        let (w, h) = canvas
                            .map(|c| (c.width() as f64, c.height() as f64))
                            .unwrap_or_default();
                        ctx.set_fill_style_str(color.as_css());
                        ctx.fill_rect(0.0, 0.0, w, h);
                    }
                    DrawCommand::OutlinedRect {
                        pos,
                        size,
                        color,
                        line_width,
                    } => {
                        ctx.set_stroke_style_str(color.as_css());
                        ctx.set_line_width(line_width as f64);
                        ctx.stroke_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                    }
                    DrawCommand::SolidRect { pos, size, color } => {
                        ctx.set_fill_style_str(color.as_css());
                        ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                    }
                    DrawCommand::Image { pos, size, sprite } => match self.sprite(sprite) {
                        Some(img) => {
                            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                                img,
                                pos.x as f64,
                                pos.y as f64,
                                size.x as f64,
                                size.y as f64,
                            );
                        }
                        // Art not loaded (yet): plain box
                        None => {
                            ctx.set_fill_style_str("white");
                            ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                        }
                    },
                    DrawCommand::Text {
                        pos,
                        text,
                        color,
                        font_size,
                    } => {
                        ctx.set_fill_style_str(color.as_css());
                        ctx.set_font(&format!("{font_size}px 'Press Start 2P', monospace"));
                        ctx.set_text_align("center");
                        let _ = ctx.fill_text(&text, pos.x as f64, pos.y as f64);
                    }
                }
            }
        }
    }

    async fn fetch_settings(window: &web_sys::Window) -> Result<Settings, JsValue> {
        let resp: Response = JsFuture::from(window.fetch_with_str("settings.json"))
            .await?
            .dyn_into()?;
        if !resp.ok() {
            return Err(JsValue::from_str(&format!(
                "settings.json: HTTP {}",
                resp.status()
            )));
        }
        let text = JsFuture::from(resp.text()?)
            .await?
            .as_string()
            .ok_or_else(|| JsValue::from_str("settings.json: not text"))?;
        Settings::from_json_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn load_sprite(sprite: Sprite) -> Result<(Sprite, HtmlImageElement), JsValue> {
        let img = HtmlImageElement::new()?;
        img.set_src(sprite.src());
        Ok((sprite, img))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Egg Survivor starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let settings = fetch_settings(&window).await?;
        log::info!("Settings loaded ({} fps)", settings.fps);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        canvas.set_width(settings.screen_width as u32);
        canvas.set_height(settings.screen_height as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let tick_ms = (1000 / settings.fps.max(1)) as i32;
        let session = Session::new(settings, seed, Box::new(LocalStorageStore))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = Rc::new(RefCell::new(Game {
            session,
            audio: AudioManager::new(),
            ctx,
            sprites: [
                load_sprite(Sprite::Egg)?,
                load_sprite(Sprite::Eggnemy)?,
                load_sprite(Sprite::Boss)?,
            ],
        }));

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                if Key::from_key(&key).is_some() {
                    event.prevent_default();
                }
                game.borrow_mut().key_down(&key);
            });
            window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Fixed-rate ticks
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || game.borrow_mut().tick());
            window.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                tick_ms,
            )?;
            closure.forget();
        }

        game.borrow().render();
        log::info!("Egg Survivor running (seed {})", seed);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use egg_survivor::audio::AudioManager;
    use egg_survivor::autopilot::Autopilot;
    use egg_survivor::leaderboard::{FileStore, MAX_LEADERBOARD_ENTRIES};
    use egg_survivor::session::Session;
    use egg_survivor::sim::Msg;
    use egg_survivor::view::leaderboard_row;
    use egg_survivor::{Settings, SettingsError};

    /// Run an autopiloted Egg Survivor session without a window
    #[derive(Debug, Parser)]
    #[command(name = "egg-survivor", version, about)]
    pub struct Args {
        /// Game settings (JSON)
        #[arg(long, default_value = "settings.json")]
        pub settings: PathBuf,

        /// RNG seed (defaults to the current time)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Stop after this many ticks if the egg is still alive
        #[arg(long, default_value_t = 18_000)]
        pub ticks: u64,

        /// Where best times are kept
        #[arg(long, default_value = "leaderboard.json")]
        pub leaderboard: PathBuf,
    }

    pub fn run(args: Args) -> Result<(), SettingsError> {
        let settings = Settings::load(&args.settings)?;

        let seed = args.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });

        let store = FileStore::new(&args.leaderboard);
        let mut session = Session::new(settings, seed, Box::new(store))?;
        let mut pilot = Autopilot::new();
        let audio = AudioManager::new();

        for _ in 0..args.ticks {
            if let Some(key) = pilot.next_key(session.snapshot()) {
                audio.play_events(session.handle(Msg::KeyDown(key)));
            }
            audio.play_events(session.tick());
            if session.snapshot().is_game_over {
                break;
            }
        }

        let model = session.snapshot();
        log::info!(
            "{} after {} (seed {}): score {}, {} eggnemies, {} bosses, level {}",
            if model.is_game_over { "Died" } else { "Survived" },
            model.timer,
            seed,
            model.score,
            model.defeated_eggnemies,
            model.defeated_bosses,
            model.egg.level
        );
        for rank in 1..=MAX_LEADERBOARD_ENTRIES {
            log::info!("{}", leaderboard_row(rank, model.leaderboard.get(rank - 1)));
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Egg Survivor (headless) starting...");

    match headless::run(headless::Args::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
