#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PanelId {
    Sound,
    Visual
}

impl PanelId {
    pub const ALL: [PanelId; 2] = [PanelId::Sound, PanelId::Visual];

    pub fn title(self) -> &'static str {
        match self {
            PanelId::Sound => "SOUND",
            PanelId::Visual => "VISUAL"
        }
    }

    fn index(self) -> usize {
        match self {
            PanelId::Sound => 0,
            PanelId::Visual => 1
        }
    }
}

/// Shown/hidden flags of every control panel plus the toggle button's own marker.
#[derive(Clone, Debug, Default)]
pub struct PanelVisibility {
    hidden: [bool; 2],
    toggle_marked_hidden: bool
}

impl PanelVisibility {
    pub fn is_hidden(&self, panel: PanelId) -> bool {
        self.hidden[panel.index()]
    }

    pub fn toggle_marked_hidden(&self) -> bool {
        self.toggle_marked_hidden
    }

    /// The first panel decides: if it is visible everything is hidden, otherwise everything is shown.
    /// Returns the new hidden state.
    pub fn toggle(&mut self) -> bool {
        let hiding = !self.hidden[0];
        for hidden in self.hidden.iter_mut() {
            *hidden = hiding;
        }
        self.toggle_marked_hidden = hiding;
        hiding
    }

    #[cfg(test)]
    pub(crate) fn set_hidden(&mut self, panel: PanelId, hidden: bool) {
        self.hidden[panel.index()] = hidden;
    }
}
