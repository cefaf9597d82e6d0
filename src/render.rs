use std::cell::Cell as DidChange;

use catppuccin::Flavour;
use chess_session::{
    coords::{cell_to_square, square_to_cell},
    rules::StandardRules,
    BoardGeometry, Cell, Piece, PieceKind, RulesEngine, Side, Square, TurnController,
};
use itertools::Itertools;
use sdl2::{
    image::LoadTexture,
    rect::Rect,
    render::{Canvas, Texture, TextureCreator},
    video::{Window, WindowContext},
};

use crate::graphics::{AsRgba, Draw};

const KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

trait CellExt {
    fn to_rect(self, geometry: &BoardGeometry) -> Rect;
}

impl CellExt for Cell {
    fn to_rect(self, geometry: &BoardGeometry) -> Rect {
        let (x, y) = geometry.cell_origin(self);
        Rect::new(x, y, geometry.cell_size, geometry.cell_size)
    }
}

fn asset_name(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::Pawn => "pawn",
        PieceKind::Knight => "knight",
        PieceKind::Bishop => "bishop",
        PieceKind::Rook => "rook",
        PieceKind::Queen => "queen",
        PieceKind::King => "king",
    }
}

fn index(piece: Piece) -> usize {
    let kind = KINDS.iter().position(|&k| k == piece.kind).unwrap_or(0);
    match piece.side {
        Side::White => kind,
        Side::Black => KINDS.len() + kind,
    }
}

/// Store for the piece textures, loaded from `assets/{kind}-{side}.png`
pub struct TextureStore<'a> {
    textures: Vec<Texture<'a>>,
}

impl<'a> TextureStore<'a> {
    pub fn new(texture_creator: &'a TextureCreator<WindowContext>) -> Result<Self, String> {
        let textures = [Side::White, Side::Black]
            .into_iter()
            .cartesian_product(KINDS)
            .map(|(side, kind)| {
                let side = match side {
                    Side::White => "white",
                    Side::Black => "black",
                };
                let path = format!("assets/{}-{side}.png", asset_name(kind));
                texture_creator
                    .load_texture(&path)
                    .map_err(|e| format!("{path}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TextureStore { textures })
    }

    fn piece_texture(&self, piece: Piece) -> &Texture<'a> {
        &self.textures[index(piece)]
    }
}

/// Draws the board of a session, only when something changed since the last frame
pub struct BoardRenderer<'a> {
    store: TextureStore<'a>,
    geometry: BoardGeometry,
    did_change: DidChange<bool>,
}

impl<'a> BoardRenderer<'a> {
    pub fn new(store: TextureStore<'a>, geometry: BoardGeometry) -> Self {
        BoardRenderer {
            store,
            geometry,
            did_change: DidChange::new(true),
        }
    }

    /// the next [`Draw::draw`] repaints the board
    pub fn mark_dirty(&self) {
        self.did_change.set(true);
    }

    /// pairs the renderer with the session it shows
    pub fn view<'s>(&'s self, controller: &'s TurnController<StandardRules>) -> BoardView<'s, 'a> {
        BoardView {
            renderer: self,
            controller,
        }
    }
}

pub struct BoardView<'s, 'a> {
    renderer: &'s BoardRenderer<'a>,
    controller: &'s TurnController<StandardRules>,
}

impl BoardView<'_, '_> {
    fn fill(
        &self,
        canvas: &mut Canvas<Window>,
        color: catppuccin::Colour,
        squares: impl IntoIterator<Item = Square>,
    ) -> Result<(), String> {
        let geometry = &self.renderer.geometry;
        let orientation = self.controller.orientation();
        let rects = squares
            .into_iter()
            .map(|square| square_to_cell(square, orientation).to_rect(geometry))
            .collect_vec();
        if rects.is_empty() {
            return Ok(());
        }
        canvas.set_draw_color(color.as_sdl());
        canvas.fill_rects(&rects)
    }
}

impl Draw for BoardView<'_, '_> {
    fn draw(&self, canvas: &mut Canvas<Window>) -> Result<bool, String> {
        if !self.renderer.did_change.get() {
            return Ok(false);
        }

        let flavor = Flavour::Mocha;
        let geometry = &self.renderer.geometry;
        let orientation = self.controller.orientation();
        let rules = self.controller.rules();

        // a1 is dark
        let (dark, light): (Vec<_>, Vec<_>) =
            Square::all().partition(|square| (square.file() + square.rank()) % 2 == 0);
        self.fill(canvas, flavor.overlay0(), dark)?;
        self.fill(canvas, flavor.overlay2(), light)?;

        if let Some(last) = self.controller.last_move() {
            self.fill(canvas, flavor.pink(), [last.from(), last.to()])?;
        }

        let selection = self.controller.selection();
        if let Some(selected) = selection.selected() {
            self.fill(canvas, flavor.teal(), [selected])?;
            self.fill(canvas, flavor.peach(), selection.highlights().iter().copied())?;
        }

        for (col, row) in (0..8).cartesian_product(0..8) {
            let cell = Cell::new(col, row);
            if let Some(piece) = rules.piece_at(cell_to_square(cell, orientation)) {
                let texture = self.renderer.store.piece_texture(piece);
                canvas.copy(texture, None, Some(cell.to_rect(geometry)))?;
            }
        }

        self.renderer.did_change.set(false);
        Ok(true)
    }
}

/// The screen shown before the game: the light half of the board picks White, the dark
/// half picks Black.
pub struct SideMenu<'s, 'a> {
    store: &'s TextureStore<'a>,
    geometry: BoardGeometry,
}

impl<'s, 'a> SideMenu<'s, 'a> {
    pub fn new(store: &'s TextureStore<'a>, geometry: BoardGeometry) -> Self {
        SideMenu { store, geometry }
    }

    /// the side whose button is under a window pixel
    pub fn side_at(&self, x: i32, y: i32) -> Option<Side> {
        [Side::White, Side::Black]
            .into_iter()
            .find(|&side| button(&self.geometry, side).contains_point((x, y)))
    }
}

fn button(geometry: &BoardGeometry, side: Side) -> Rect {
    let half = geometry.board_size() / 2;
    let x = match side {
        Side::White => geometry.origin_x,
        Side::Black => geometry.origin_x + half as i32,
    };
    Rect::new(x, geometry.origin_y, half, geometry.board_size())
}

impl Draw for SideMenu<'_, '_> {
    fn draw(&self, canvas: &mut Canvas<Window>) -> Result<bool, String> {
        let flavor = Flavour::Mocha;
        let size = self.geometry.cell_size * 2;

        for (side, color) in [(Side::White, flavor.overlay2()), (Side::Black, flavor.overlay0())] {
            let rect = button(&self.geometry, side);
            canvas.set_draw_color(color.as_sdl());
            canvas.fill_rect(Some(rect))?;

            let king = self.store.piece_texture(Piece::new(PieceKind::King, side));
            let mut icon = Rect::new(0, 0, size, size);
            icon.center_on(rect.center());
            canvas.copy(king, None, Some(icon))?;
        }
        Ok(true)
    }
}
