use super::collaborators::SelectionTracker;
use crate::models::Visit;

/// Stock selection tracker: insertion-ordered set of visits with change listeners
#[derive(Default)]
pub struct VisitSelection {
    selected: Vec<Visit>,
    listeners: Vec<Box<dyn FnMut(&[Visit])>>,
}

impl VisitSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.selected);
        }
    }
}

impl SelectionTracker for VisitSelection {
    fn is_selected(&self, visit: &Visit) -> bool {
        self.selected.contains(visit)
    }

    fn toggle(&mut self, visit: &Visit) {
        match self.selected.iter().position(|v| v == visit) {
            Some(idx) => {
                self.selected.remove(idx);
            }
            None => self.selected.push(visit.clone()),
        }
        self.notify();
    }

    fn selected_items(&self) -> Vec<Visit> {
        self.selected.clone()
    }

    fn clear_selection(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.notify();
        }
    }

    fn on_change(&mut self, listener: Box<dyn FnMut(&[Visit])>) {
        self.listeners.push(listener);
    }
}
