//! Home view

use trail::NavigationPublisher;

/// Entering home leaves every section, so the trail is cleared
pub struct HomeView {
    nav: NavigationPublisher,
}

impl HomeView {
    pub fn new(nav: NavigationPublisher) -> Self {
        Self { nav }
    }

    pub fn enter(&self) {
        self.nav.left_section();
    }
}
