pub mod grid;
pub mod layered;

#[derive(Debug, Clone)]
pub enum Algorithm {
    /// Row-major grid of equally sized cells.
    Grid(GridOptions),
    /// Rank-based layered layout (a small dagre-style pipeline).
    Layered(LayeredOptions),
    /// Keep current positions.
    Preset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Some(Self::TB),
            "BT" => Some(Self::BT),
            "LR" => Some(Self::LR),
            "RL" => Some(Self::RL),
            _ => None,
        }
    }

    /// Ranks advance along x (`LR`/`RL`) rather than y.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }

    /// Ranks advance towards negative coordinates (`BT`/`RL`).
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BT | Self::RL)
    }
}

#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Fixed column count; defaults to `ceil(sqrt(n))`.
    pub cols: Option<usize>,
    /// Gap added to the largest member size to form a cell.
    pub spacing: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            cols: None,
            spacing: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayeredOptions {
    pub rankdir: RankDir,
    pub nodesep: f64,
    pub ranksep: f64,
}

impl Default for LayeredOptions {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            ranksep: 50.0,
        }
    }
}
