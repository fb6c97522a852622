//! In-memory location catalog

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::ports::LocationCatalog;
use crate::domain::{DomainError, DomainResult, Location, SpotId, SpotLayout};

/// Static catalog for the demo deployment and for tests
pub struct InMemoryCatalog {
    locations: Vec<Location>,
    layout: SpotLayout,
    occupied: HashMap<String, Vec<SpotId>>,
}

impl InMemoryCatalog {
    pub fn new(locations: Vec<Location>) -> Self {
        Self {
            locations,
            layout: SpotLayout::standard(),
            occupied: HashMap::new(),
        }
    }

    /// The nine demo locations around Kuala Lumpur.
    pub fn standard() -> Self {
        let rate = |cents: i64| Decimal::new(cents, 2);
        Self::new(vec![
            Location::new("pw_a1", "Airport Economy Lot", "789 Skyway Rd, Terminal Area", rate(300), 150)
                .with_coordinates(3.1201, 101.6544),
            Location::new("pw_a2", "Downtown Metro Garage", "123 Main St, City Center", rate(2200), 80)
                .with_coordinates(3.1478, 101.6953),
            Location::new("pw_a3", "City Center Mall Parking", "456 Commerce Ave, Retail District", rate(400), 200)
                .with_coordinates(3.1579, 101.7116),
            Location::new("pw_b1", "University Campus Lot B", "10 University Dr, Academic Zone", rate(250), 120)
                .with_coordinates(3.1209, 101.6538),
            Location::new("pw_b2", "General Hospital Visitor Parking", "20 Healthway Blvd, Medical Campus", rate(475), 60)
                .with_coordinates(3.1717, 101.7020),
            Location::new("pw_b3", "Stadium Event Parking - North", "30 Victory Ln, Sports Complex", rate(1000), 300)
                .with_coordinates(3.0546, 101.6911),
            Location::new("pw_c1", "Westside Business Park Deck", "500 Corporate Pkwy, Business District", rate(375), 90)
                .with_coordinates(3.1344, 101.6295),
            Location::new("pw_c2", "Coastal View Beach Access", "1 Ocean Front Walk, Coastal Area", rate(600), 40)
                .with_coordinates(3.0047, 101.3925),
            Location::new("pw_c3", "Mountain Trailhead Parking", "99 Peak Rd, Recreational Area", rate(150), 50)
                .with_coordinates(3.2375, 101.6839),
        ])
    }

    /// Mark spots of a location as already booked. Unknown labels are skipped.
    pub fn with_occupied<S: AsRef<str>>(mut self, location_id: &str, spots: &[S]) -> Self {
        let spots = spots
            .iter()
            .filter_map(|s| SpotId::parse(s.as_ref()))
            .filter(|s| self.layout.contains(s))
            .collect();
        self.occupied.insert(location_id.to_string(), spots);
        self
    }

    /// Like [`with_occupied`](Self::with_occupied), but an unknown location
    /// or a label outside the grid is an error instead of being skipped.
    pub fn try_with_occupied<S: AsRef<str>>(
        self,
        location_id: &str,
        spots: &[S],
    ) -> DomainResult<Self> {
        if self.find(location_id).is_none() {
            return Err(DomainError::not_found("Location", location_id));
        }
        if let Some(bad) = spots.iter().map(|s| s.as_ref()).find(|raw| {
            !SpotId::parse(raw).is_some_and(|spot| self.layout.contains(&spot))
        }) {
            return Err(DomainError::validation(format!(
                "Unknown parking spot '{}' at {}.",
                bad, location_id
            )));
        }
        Ok(self.with_occupied(location_id, spots))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl LocationCatalog for InMemoryCatalog {
    fn list(&self) -> Vec<Location> {
        self.locations.clone()
    }

    fn find(&self, id: &str) -> Option<Location> {
        self.locations.iter().find(|l| l.id == id).cloned()
    }

    fn layout(&self, _location_id: &str) -> SpotLayout {
        self.layout.clone()
    }

    fn occupied_spots(&self, location_id: &str) -> Vec<SpotId> {
        self.occupied.get(location_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog() {
        let catalog = InMemoryCatalog::standard();
        assert_eq!(catalog.len(), 9);
        let garage = catalog.find("pw_a2").unwrap();
        assert_eq!(garage.name, "Downtown Metro Garage");
        assert_eq!(garage.hourly_rate, Decimal::new(22, 0));
        assert!(catalog.find("pw_x1").is_none());
        assert!(catalog.list().iter().all(|l| l.latitude.is_some()));
    }

    #[test]
    fn occupied_defaults_to_empty() {
        let catalog = InMemoryCatalog::standard().with_occupied("pw_a1", &["a1", "B2", "Z9"]);
        assert_eq!(
            catalog.occupied_spots("pw_a1"),
            vec![SpotId::parse("A1").unwrap(), SpotId::parse("B2").unwrap()]
        );
        assert!(catalog.occupied_spots("pw_a2").is_empty());
    }

    #[test]
    fn strict_occupancy_rejects_typos() {
        let err = InMemoryCatalog::standard()
            .try_with_occupied("pw_zz", &["A1"])
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = InMemoryCatalog::standard()
            .try_with_occupied("pw_a1", &["A1", "Q9"])
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::Validation(_)));

        let catalog = InMemoryCatalog::standard()
            .try_with_occupied("pw_a1", &[" c3 "])
            .unwrap();
        assert_eq!(catalog.occupied_spots("pw_a1"), vec![SpotId::parse("C3").unwrap()]);
    }
}
