/// A clue placed in the world for the current scene activation. Rebuilt on
/// every scene load; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScenePlacement {
    pub(crate) position: WorldPosition,
    pub(crate) info: ClueInfo,
    pub(crate) collected: bool,
}

/// Plain minimap data for the presentation layer: area tiles in grid order
/// plus actor markers in world-normalized coordinates.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MinimapArea {
    pub(crate) name: String,
    pub(crate) color: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MinimapMarker {
    pub(crate) kind: ActorKind,
    pub(crate) id: String,
    pub(crate) normalized_x: f32,
    pub(crate) normalized_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MinimapModel {
    pub(crate) title: String,
    pub(crate) grid_cols: usize,
    pub(crate) grid_rows: usize,
    pub(crate) areas: Vec<MinimapArea>,
    pub(crate) markers: Vec<MinimapMarker>,
}
