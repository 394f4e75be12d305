use std::path::PathBuf;

use clap::Parser;
use hashbrown::HashMap;
use ludo::{
    config::Config,
    ludo::{
        BoardGeometry, Cell, Event, Notification, PendingAction, Player, RngFaces, StandardBoard, TokenId,
        TurnController, geometry::BOARD_CELLS,
    },
};
use nannou::{
    App, Frame,
    color::{self, Srgb},
    event::{Key, MouseButton},
    geom::{Point2, Rect, pt2},
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Game = TurnController<StandardBoard, RngFaces<StdRng>>;

const HEADER_HEIGHT: f32 = 90.0;

/// Play Ludo in a window: Space rolls, 1-4 or a click picks a token.
#[derive(Parser, Debug)]
#[command(name = "ludo")]
struct Args {
    /// YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    nannou::app(model).run();
}

struct Model {
    game: Game,
    seed: Option<u64>,
    message: String,
}

fn new_game(seed: Option<u64>) -> Game {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    match TurnController::new(StandardBoard::new(), RngFaces::new(rng)) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn model(app: &App) -> Model {
    let args = Args::parse();
    let config = match Config::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    app.new_window()
        .title("Ludo")
        .size(750, 840)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .build()
        .unwrap();

    Model {
        game: new_game(config.game.seed),
        seed: config.game.seed,
        message: "Space rolls, 1-4 or a click picks a token".to_string(),
    }
}

fn dispatch(model: &mut Model, event: Event) {
    match model.game.handle(event) {
        Ok(notifications) => {
            model.message = notifications.iter().map(describe).collect::<Vec<_>>().join(", ");
            info!("{}", model.message);
        }
        Err(e) => {
            warn!(%e, "event refused");
            model.message = e.to_string();
        }
    }
}

fn describe(notification: &Notification) -> String {
    match *notification {
        Notification::Rolled { player, value } => format!("{player} rolled {value}"),
        Notification::NoMovableToken { player, .. } => format!("{player} cannot move"),
        Notification::TokenActivated { token } => format!("{token} enters the board"),
        Notification::TokenMoved { token, from, to } => format!("{token} {from} -> {to}"),
        Notification::MoveForfeited { token } => format!("{token} cannot go that far"),
        Notification::TokenCaptured { token, by } => format!("{by} captures {token}"),
        Notification::TokenFinished { token } => format!("{token} is home"),
        Notification::PlayerWon { player } => format!("{player} wins!"),
        Notification::ExtraTurn { player } => format!("{player} rolls again"),
        Notification::TurnPassed { to, .. } => format!("{to}'s turn"),
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    let slot = match key {
        Key::Space => return dispatch(model, Event::RollRequested),
        Key::R if model.game.winner().is_some() => {
            model.game = new_game(model.seed.map(|seed| seed.wrapping_add(1)));
            model.message = "New game".to_string();
            return;
        }
        Key::Key1 => 0,
        Key::Key2 => 1,
        Key::Key3 => 2,
        Key::Key4 => 3,
        _ => return,
    };
    if let Some(token) = TokenId::new(model.game.current_player(), slot) {
        dispatch(model, Event::TokenSelected(token));
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    let layout = Layout::new(app.window_rect());
    let Some(cell) = layout.cell_at(app.mouse.position()) else {
        return;
    };

    // Prefer a token that can use the roll when several share the cell.
    let movable = model.game.movable_tokens();
    let tokens = model.game.tokens();
    let candidates: Vec<TokenId> = TokenId::of_player(model.game.current_player())
        .filter(|&id| tokens.waypoint_of(id) == cell)
        .collect();
    let picked = candidates.iter().find(|id| movable.contains(id)).or(candidates.first()).copied();

    if let Some(token) = picked {
        dispatch(model, Event::TokenSelected(token));
    }
}

/// Maps board cells to window coordinates.
struct Layout {
    left: f32,
    top: f32,
    cell: f32,
}

impl Layout {
    fn new(window: Rect) -> Self {
        let size = window.w().min(window.h() - HEADER_HEIGHT);
        Layout {
            left: window.x() - size / 2.0,
            top: window.top() - HEADER_HEIGHT,
            cell: size / BOARD_CELLS as f32,
        }
    }

    fn center(&self, cell: Cell) -> Point2 {
        pt2(
            self.left + (cell.col as f32 + 0.5) * self.cell,
            self.top - (cell.row as f32 + 0.5) * self.cell,
        )
    }

    fn cell_at(&self, point: Point2) -> Option<Cell> {
        let col = ((point.x - self.left) / self.cell).floor();
        let row = ((self.top - point.y) / self.cell).floor();
        let range = 0.0..BOARD_CELLS as f32;
        (range.contains(&col) && range.contains(&row)).then(|| Cell::new(col as u8, row as u8))
    }
}

fn player_color(player: Player) -> Srgb<u8> {
    match player {
        Player::Green => color::FORESTGREEN,
        Player::Yellow => color::GOLD,
        Player::Blue => color::ROYALBLUE,
        Player::Red => color::CRIMSON,
    }
}

fn player_tint(player: Player) -> Srgb<u8> {
    match player {
        Player::Green => color::PALEGREEN,
        Player::Yellow => color::LIGHTYELLOW,
        Player::Blue => color::LIGHTBLUE,
        Player::Red => color::PINK,
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(color::WHITE);

    let window_rect = app.window_rect();
    let layout = Layout::new(window_rect);
    let board = model.game.tokens().geometry();

    // Yards: the 6x6 corner blocks, turned with each seat.
    for player in Player::ALL {
        let corner = board.home_waypoint(player, 0);
        let opposite = board.home_waypoint(player, 3);
        let (a, b) = (layout.center(corner), layout.center(opposite));
        let center = (a + b) / 2.0;
        draw.rect()
            .xy(center)
            .w_h(layout.cell * 6.0, layout.cell * 6.0)
            .color(player_color(player))
            .stroke(color::BLACK)
            .stroke_weight(1.0);
        draw.rect()
            .xy(center)
            .w_h(layout.cell * 4.0, layout.cell * 4.0)
            .color(color::WHITE);
        for slot in 0..4 {
            draw.ellipse()
                .xy(layout.center(board.home_waypoint(player, slot)))
                .w_h(layout.cell * 0.8, layout.cell * 0.8)
                .color(player_tint(player))
                .stroke(color::BLACK)
                .stroke_weight(1.0);
            draw.rect()
                .xy(layout.center(board.launch_waypoint(player, slot)))
                .w_h(layout.cell * 0.9, layout.cell * 0.9)
                .no_fill()
                .stroke(player_color(player))
                .stroke_weight(2.0);
        }
    }

    // Track: shared loop in white, entry cells and home columns tinted.
    for cell in StandardBoard::loop_cells() {
        draw.rect()
            .xy(layout.center(cell))
            .w_h(layout.cell, layout.cell)
            .color(color::WHITE)
            .stroke(color::BLACK)
            .stroke_weight(1.0);
    }
    for player in Player::ALL {
        let path = board.path(player);
        let private_start = path.len() - 6;
        for (index, &cell) in path.iter().enumerate() {
            if index == 0 || index >= private_start {
                draw.rect()
                    .xy(layout.center(cell))
                    .w_h(layout.cell, layout.cell)
                    .color(player_color(player))
                    .stroke(color::BLACK)
                    .stroke_weight(1.0);
            }
        }
    }

    // Tokens, fanned out when they share a cell.
    let mut stacks: HashMap<Cell, Vec<TokenId>> = HashMap::new();
    for token in model.game.tokens().tokens() {
        stacks.entry(model.game.tokens().waypoint_of(token.id())).or_default().push(token.id());
    }
    for (cell, ids) in stacks.iter() {
        let center = layout.center(*cell);
        let size = if ids.len() > 1 { layout.cell * 0.5 } else { layout.cell * 0.7 };
        for (i, id) in ids.iter().enumerate() {
            let offset = if ids.len() > 1 {
                let angle = i as f32 / ids.len() as f32 * std::f32::consts::TAU;
                pt2(angle.cos(), angle.sin()) * layout.cell * 0.22
            } else {
                pt2(0.0, 0.0)
            };
            draw.ellipse()
                .xy(center + offset)
                .w_h(size, size)
                .color(player_color(id.owner()))
                .stroke(color::BLACK)
                .stroke_weight(2.0);
            draw.text(&(id.slot() + 1).to_string())
                .xy(center + offset)
                .font_size((size * 0.6) as u32)
                .color(color::WHITE);
        }
    }

    // Header: whose turn, what to do, the die.
    let player = model.game.current_player();
    let header_y = window_rect.top() - 30.0;
    draw.text(&format!("Player: {player}"))
        .x_y(window_rect.left() + 130.0, header_y)
        .w(240.0)
        .font_size(24)
        .color(player_color(player));

    let action = match (model.game.winner(), model.game.pending_action()) {
        (Some(winner), _) => format!("{winner} won, R restarts"),
        (None, PendingAction::RollDie) => "Do: Roll Dice".to_string(),
        (None, PendingAction::MoveToken) => "Do: Move Piece".to_string(),
    };
    draw.text(&action)
        .x_y(window_rect.x(), header_y)
        .w(260.0)
        .font_size(24)
        .color(color::BLACK);

    let die = model.game.die_value().map_or("-".to_string(), |value| value.to_string());
    draw.rect()
        .x_y(window_rect.right() - 60.0, header_y)
        .w_h(44.0, 44.0)
        .color(color::WHITE)
        .stroke(color::BLACK)
        .stroke_weight(2.0);
    draw.text(&die)
        .x_y(window_rect.right() - 60.0, header_y)
        .font_size(28)
        .color(color::BLACK);

    draw.text(&model.message)
        .x_y(window_rect.x(), window_rect.top() - 70.0)
        .w(window_rect.w() - 20.0)
        .font_size(14)
        .color(color::DIMGRAY);

    draw.to_frame(app, &frame).unwrap();
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["ludo", "--config", "ludo.yaml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("ludo.yaml")));
        assert_eq!(Args::try_parse_from(["ludo"]).unwrap().config, None);

        let help = Args::try_parse_from(["ludo", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
        assert!(Args::try_parse_from(["ludo", "ludo.yaml"]).is_err());
    }
}
