//! Screen routing: one navigation stack per tab

use crate::models::Recipient;

/// Top-level tabs, each owning its own stack
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppTab {
    #[default]
    Chats,
    Search,
    Settings,
}

impl AppTab {
    pub const ALL: [AppTab; 3] = [AppTab::Chats, AppTab::Search, AppTab::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            AppTab::Chats => "Chats",
            AppTab::Search => "Search",
            AppTab::Settings => "Settings",
        }
    }

    fn root(&self) -> Route {
        match self {
            AppTab::Chats => Route::ChatList,
            AppTab::Search => Route::Search,
            AppTab::Settings => Route::SettingsList,
        }
    }
}

/// A screen that can sit on a stack
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Route {
    #[default]
    ChatList,
    Conversation(Recipient),
    Search,
    SettingsList,
    Account,
    About,
}

impl Route {
    pub fn title(&self) -> String {
        match self {
            Route::ChatList => String::from("Chats"),
            Route::Conversation(recipient) => recipient.title().to_string(),
            Route::Search => String::from("Find friends"),
            Route::SettingsList => String::from("Settings"),
            Route::Account => String::from("Account"),
            Route::About => String::from("About"),
        }
    }
}

/// Stack of routes over a fixed root. The root is never popped.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationStack {
    routes: Vec<Route>,
}

impl NavigationStack {
    pub fn new(root: Route) -> Self {
        NavigationStack { routes: vec![root] }
    }

    pub fn current(&self) -> &Route {
        // routes always holds the root
        &self.routes[self.routes.len() - 1]
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Pop the top route; returns None when already at the root
    pub fn pop(&mut self) -> Option<Route> {
        if self.routes.len() > 1 {
            self.routes.pop()
        } else {
            None
        }
    }

    /// Drop everything above the root
    pub fn reset(&mut self) {
        self.routes.truncate(1);
    }

    pub fn depth(&self) -> usize {
        self.routes.len()
    }
}

/// The tab bar plus its stacks
#[derive(Clone, Debug)]
pub struct Navigator {
    active: AppTab,
    stacks: [NavigationStack; 3],
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Navigator {
            active: AppTab::Chats,
            stacks: AppTab::ALL.map(|tab| NavigationStack::new(tab.root())),
        }
    }

    fn index(tab: AppTab) -> usize {
        match tab {
            AppTab::Chats => 0,
            AppTab::Search => 1,
            AppTab::Settings => 2,
        }
    }

    pub fn active_tab(&self) -> AppTab {
        self.active
    }

    /// Switch tabs, keeping each tab's history
    pub fn switch(&mut self, tab: AppTab) {
        self.active = tab;
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stacks[Self::index(self.active)]
    }

    fn stack_mut(&mut self) -> &mut NavigationStack {
        &mut self.stacks[Self::index(self.active)]
    }

    pub fn current(&self) -> &Route {
        self.stack().current()
    }

    pub fn push(&mut self, route: Route) {
        self.stack_mut().push(route);
    }

    pub fn pop(&mut self) -> Option<Route> {
        self.stack_mut().pop()
    }

    /// Open a conversation on the Chats stack, replacing any open one
    pub fn open_conversation(&mut self, recipient: Recipient) {
        self.active = AppTab::Chats;
        let stack = self.stack_mut();
        stack.reset();
        stack.push(Route::Conversation(recipient));
    }

    /// Apply `update` to every open conversation with `recipient_id`
    pub fn update_recipient(&mut self, recipient_id: &str, update: impl Fn(&mut Recipient)) {
        for stack in &mut self.stacks {
            for route in &mut stack.routes {
                if let Route::Conversation(recipient) = route {
                    if recipient.id == recipient_id {
                        update(recipient);
                    }
                }
            }
        }
    }
}

/// Entries of the settings list, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsItem {
    Theme,
    Nickname,
    Account,
    About,
    LogOut,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 5] = [
        SettingsItem::Theme,
        SettingsItem::Nickname,
        SettingsItem::Account,
        SettingsItem::About,
        SettingsItem::LogOut,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsItem::Theme => "Theme",
            SettingsItem::Nickname => "Nickname",
            SettingsItem::Account => "Account",
            SettingsItem::About => "About",
            SettingsItem::LogOut => "Log out",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SettingsItem::Theme => "Pick the color theme",
            SettingsItem::Nickname => "Set your own display nickname",
            SettingsItem::Account => "Signed-in identity and backend",
            SettingsItem::About => "Version information",
            SettingsItem::LogOut => "Forget the stored user id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PresenceStatus, RecipientKind};

    fn contact(id: &str) -> Recipient {
        Recipient {
            id: id.into(),
            display_name: format!("User {}", id),
            nickname: None,
            avatar: None,
            status: PresenceStatus::Online,
            kind: RecipientKind::Private,
        }
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut stack = NavigationStack::new(Route::SettingsList);
        assert_eq!(stack.pop(), None);
        stack.push(Route::About);
        assert_eq!(stack.current(), &Route::About);
        assert_eq!(stack.pop(), Some(Route::About));
        assert_eq!(stack.current(), &Route::SettingsList);
    }

    #[test]
    fn test_tabs_keep_history() {
        let mut nav = Navigator::new();
        nav.switch(AppTab::Settings);
        nav.push(Route::Account);
        nav.switch(AppTab::Search);
        assert_eq!(nav.current(), &Route::Search);
        nav.switch(AppTab::Settings);
        assert_eq!(nav.current(), &Route::Account);
    }

    #[test]
    fn test_open_conversation_replaces_previous() {
        let mut nav = Navigator::new();
        nav.switch(AppTab::Search);
        nav.open_conversation(contact("a"));
        nav.open_conversation(contact("b"));
        assert_eq!(nav.active_tab(), AppTab::Chats);
        assert_eq!(nav.stack().depth(), 2);
        assert_eq!(nav.current().title(), "User b");

        nav.update_recipient("b", |r| r.nickname = Some("Bee".into()));
        assert_eq!(nav.current().title(), "Bee");
    }
}
