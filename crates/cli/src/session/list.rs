//! Roundtrip list view
//!
//! Tracks which roundtrip the route points at and announces its name on the
//! navigation channel so it shows up in the breadcrumb trail.

use super::roundtrip::Roundtrip;
use tracing::debug;
use trail::NavigationPublisher;

pub struct RoundtripListView {
    nav: NavigationPublisher,
    roundtrips: Vec<Roundtrip>,
    selected: Option<u64>,
}

impl RoundtripListView {
    pub fn new(nav: NavigationPublisher, roundtrips: Vec<Roundtrip>) -> Self {
        Self {
            nav,
            roundtrips,
            selected: None,
        }
    }

    /// React to a change of the `roundtripId` route parameter
    ///
    /// Unknown or unparsable ids clear the selection without announcing
    /// anything. Returns the selected roundtrip, if known.
    pub fn select(&mut self, route_id: Option<&str>) -> Option<Roundtrip> {
        self.selected = route_id.and_then(|id| id.trim().parse().ok());
        let id = self.selected?;

        let roundtrip = self.roundtrips.iter().find(|r| r.id == id).cloned();
        match &roundtrip {
            Some(r) => {
                self.nav.navigated_to(r.name.clone());
            }
            None => debug!("Route points at unknown roundtrip {}", id),
        }
        roundtrip
    }

    /// CSS class for a list entry
    pub fn active_class(&self, id: u64) -> &'static str {
        if self.selected == Some(id) {
            "active"
        } else {
            ""
        }
    }

    pub fn on_roundtrip_added(&mut self, roundtrip: Roundtrip) {
        self.roundtrips.push(roundtrip);
    }

    pub fn roundtrips(&self) -> &[Roundtrip] {
        &self.roundtrips
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trail::navigation_channel;

    fn roundtrips() -> Vec<Roundtrip> {
        vec![
            Roundtrip { id: 1, name: "Invoice".to_string() },
            Roundtrip { id: 2, name: "Billing".to_string() },
        ]
    }

    #[test]
    fn test_select_announces_roundtrip_name() {
        let (nav, mut events) = navigation_channel();
        let mut list = RoundtripListView::new(nav, roundtrips());

        let selected = list.select(Some("2"));

        assert_eq!(selected.map(|r| r.name), Some("Billing".to_string()));
        let event = events.try_recv().unwrap();
        assert_eq!(event.item.unwrap().name, "Billing");
        assert_eq!(list.active_class(2), "active");
        assert_eq!(list.active_class(1), "");
    }

    #[test]
    fn test_unknown_or_missing_id_announces_nothing() {
        let (nav, mut events) = navigation_channel();
        let mut list = RoundtripListView::new(nav, roundtrips());

        assert!(list.select(Some("9")).is_none());
        assert_eq!(list.selected(), Some(9));
        assert!(list.select(Some("abc")).is_none());
        assert!(list.select(None).is_none());
        assert_eq!(list.selected(), None);

        assert!(events.try_recv().is_none());
    }

    #[test]
    fn test_added_roundtrip_becomes_selectable() {
        let (nav, mut events) = navigation_channel();
        let mut list = RoundtripListView::new(nav, Vec::new());

        list.on_roundtrip_added(Roundtrip { id: 3, name: "Shipping".to_string() });
        list.select(Some("3"));

        assert_eq!(list.roundtrips().len(), 1);
        assert_eq!(events.try_recv().unwrap().item.unwrap().name, "Shipping");
    }
}
