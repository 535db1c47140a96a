use crate::dialogs::{channel, DialogHandle, DialogView, Resolver};
use crate::models::Theme;

/// Picks one theme out of the fixed option set
#[derive(Debug)]
pub struct ThemeSelectorDialog {
    selected: usize,
    resolver: Resolver<Theme>,
}

impl ThemeSelectorDialog {
    pub fn open(current: Theme) -> (Self, DialogHandle<Theme>) {
        let (resolver, handle) = channel();
        let selected = Theme::ALL.iter().position(|t| *t == current).unwrap_or(0);
        (ThemeSelectorDialog { selected, resolver }, handle)
    }

    pub fn options(&self) -> &'static [Theme] {
        &Theme::ALL
    }

    pub fn selected(&self) -> Theme {
        Theme::ALL[self.selected]
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % Theme::ALL.len();
    }

    pub fn prev(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(Theme::ALL.len() - 1);
    }

    pub fn select(&mut self, theme: Theme) {
        if let Some(pos) = Theme::ALL.iter().position(|t| *t == theme) {
            self.selected = pos;
        }
    }

    pub fn confirm(&mut self) -> bool {
        let theme = self.selected();
        self.resolver.resolve(Some(theme))
    }

    pub fn cancel(&mut self) -> bool {
        self.resolver.resolve(None)
    }

    pub fn view(&self) -> DialogView {
        DialogView::Choice {
            title: String::from(" Theme "),
            options: Theme::ALL.iter().map(|t| t.to_string()).collect(),
            selected: self.selected,
        }
    }
}
