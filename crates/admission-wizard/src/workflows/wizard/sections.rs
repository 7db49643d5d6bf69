use serde::Serialize;

use super::domain::{EntryMarker, WizardView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionState {
    pub view: WizardView,
    pub hidden: bool,
    pub marker: Option<EntryMarker>,
}

/// Visibility of the four page sections. Exactly one is visible at a time.
#[derive(Debug, Clone)]
pub struct SectionBoard {
    sections: [SectionState; 4],
}

impl SectionBoard {
    pub fn new() -> Self {
        let sections = WizardView::ordered().map(|view| SectionState {
            view,
            hidden: view != WizardView::Search,
            marker: None,
        });
        Self { sections }
    }

    /// Hide everything, strip stale markers, then reveal `view`.
    pub fn enter(&mut self, view: WizardView) -> Option<EntryMarker> {
        for section in &mut self.sections {
            section.hidden = true;
            section.marker = None;
        }

        let marker = view.entry_marker();
        let target = &mut self.sections[view.index()];
        target.hidden = false;
        target.marker = marker;
        marker
    }

    pub fn active(&self) -> WizardView {
        self.sections
            .iter()
            .find(|section| !section.hidden)
            .map(|section| section.view)
            .unwrap_or(WizardView::Search)
    }

    pub fn visible(&self) -> Vec<WizardView> {
        self.sections
            .iter()
            .filter(|section| !section.hidden)
            .map(|section| section.view)
            .collect()
    }

    pub fn sections(&self) -> &[SectionState] {
        &self.sections
    }
}

impl Default for SectionBoard {
    fn default() -> Self {
        Self::new()
    }
}
