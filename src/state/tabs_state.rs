//! TabsState - Active Tab of the Device Panel

/// The three tabs of the device panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveTab {
    /// Device info and property editing
    #[default]
    Info,
    /// Paginated device roster
    List,
    /// Property history
    History,
}
