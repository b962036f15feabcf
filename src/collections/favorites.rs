//! Favorite time zones in user-chosen order.
//!
//! New favorites are appended; `reorder` moves one to a new position by
//! deleting it and re-inserting it positionally. After every mutation
//! each favorite's `order` field is renumbered to its ring position, so
//! the persisted records always carry `0..len` in ring order.

use log::warn;

use crate::error::{ClockError, ClockResult};
use crate::ring::{CircularList, Direction, Iter};
use crate::types::{FavoriteTimezone, TimeOfDay, TimezoneCatalog};

const COLLECTION: &str = "favorites";

#[derive(Debug, Clone, Default)]
pub struct FavoriteZones {
    zones: CircularList<FavoriteTimezone>,
}

impl FavoriteZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            zones: CircularList::with_capacity(capacity),
        }
    }

    /// Replace the contents with persisted records, in stored order.
    ///
    /// A repeated id is skipped; the first occurrence is kept.
    pub fn load(&mut self, records: impl IntoIterator<Item = FavoriteTimezone>) -> usize {
        self.zones.clear();
        for zone in records {
            if self.is_favorite(&zone.id) {
                warn!("skipping duplicate favorite '{}'", zone.id);
                continue;
            }
            self.zones.insert_at_end(zone);
        }
        self.renumber();
        self.zones.size()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append zone `id` from `catalog` to the favorites.
    ///
    /// # Errors
    ///
    /// * `NotFound` - `id` is not in the catalog
    /// * `AlreadyFavorite` - `id` is already a favorite
    ///
    /// # Example
    ///
    /// ```
    /// use clock_ring::collections::FavoriteZones;
    /// use clock_ring::types::TimezoneCatalog;
    ///
    /// let catalog = TimezoneCatalog::fallback();
    /// let mut favorites = FavoriteZones::new();
    ///
    /// favorites.add(&catalog, "japan-tokyo").unwrap();
    /// let london = favorites.add(&catalog, "united-kingdom-london").unwrap();
    /// assert_eq!(london.order, 1);
    /// assert!(favorites.add(&catalog, "japan-tokyo").is_err());
    /// ```
    pub fn add(&mut self, catalog: &TimezoneCatalog, id: &str) -> ClockResult<FavoriteTimezone> {
        let Some(zone) = catalog.get(id) else {
            warn!("time zone '{id}' not in catalog");
            return Err(ClockError::NotFound(format!("time zone '{id}'")));
        };
        if self.is_favorite(id) {
            return Err(ClockError::AlreadyFavorite(id.to_string()));
        }

        let favorite = FavoriteTimezone::from_zone(zone, self.zones.size());
        self.zones.insert_at_end(favorite.clone());
        Ok(favorite)
    }

    /// Remove favorite `id`, returning it
    pub fn remove(&mut self, id: &str) -> ClockResult<FavoriteTimezone> {
        let removed = self.zones.delete(|zone| zone.id == id).ok_or_else(|| {
            warn!("favorite '{id}' not found");
            ClockError::NotFound(format!("favorite '{id}'"))
        })?;
        self.renumber();
        Ok(removed)
    }

    /// Move favorite `id` to `new_position`.
    ///
    /// Positions past the end are clamped to the last slot. Returns the
    /// favorite with its new `order`.
    pub fn reorder(&mut self, id: &str, new_position: usize) -> ClockResult<FavoriteTimezone> {
        let count = self.zones.size();
        let position = if new_position >= count && count > 0 {
            warn!("reorder position {new_position} for '{id}' clamped to {}", count - 1);
            count - 1
        } else {
            new_position
        };

        let favorite = self.zones.delete(|zone| zone.id == id).ok_or_else(|| {
            warn!("favorite '{id}' not found");
            ClockError::NotFound(format!("favorite '{id}'"))
        })?;
        self.zones.insert_at(position, favorite);
        self.renumber();

        self.get(id)
            .cloned()
            .ok_or_else(|| ClockError::NotFound(format!("favorite '{id}'")))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, id: &str) -> Option<&FavoriteTimezone> {
        self.zones.find(|zone| zone.id == id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.zones.contains(|zone| zone.id == id)
    }

    /// Every favorite in user order
    pub fn all(&self) -> Vec<FavoriteTimezone> {
        self.zones.get_all()
    }

    pub fn iter(&self) -> Iter<'_, FavoriteTimezone> {
        self.zones.iter()
    }

    pub fn first(&self) -> Option<&FavoriteTimezone> {
        self.zones.first()
    }

    pub fn len(&self) -> usize {
        self.zones.size()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Local wall-clock time of favorite `id` for a UTC time of day
    pub fn local_time(&self, id: &str, utc: TimeOfDay) -> ClockResult<TimeOfDay> {
        self.get(id)
            .map(|zone| zone.local_time(utc))
            .ok_or_else(|| ClockError::NotFound(format!("favorite '{id}'")))
    }

    pub fn navigate(&self, id: &str, direction: Direction) -> ClockResult<&FavoriteTimezone> {
        self.zones
            .navigate(|zone| zone.id == id, direction)
            .map_err(|err| {
                warn!("favorite navigation from '{id}' ({direction}) failed: {err}");
                ClockError::from_list(err, COLLECTION, format!("favorite '{id}'"))
            })
    }

    fn renumber(&mut self) {
        self.zones.update_each(|position, zone| zone.order = position);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TOKYO: &str = "japan-tokyo";
    const LONDON: &str = "united-kingdom-london";
    const NEW_YORK: &str = "united-states-new-york";

    fn favorites(ids: &[&str]) -> FavoriteZones {
        let catalog = TimezoneCatalog::fallback();
        let mut favorites = FavoriteZones::new();
        for id in ids {
            favorites.add(&catalog, id).unwrap();
        }
        favorites
    }

    fn ids(favorites: &FavoriteZones) -> Vec<String> {
        favorites.iter().map(|zone| zone.id.clone()).collect()
    }

    fn orders(favorites: &FavoriteZones) -> Vec<usize> {
        favorites.iter().map(|zone| zone.order).collect()
    }

    #[test]
    fn test_add_appends() {
        let favorites = favorites(&[TOKYO, LONDON, NEW_YORK]);

        assert_eq!(ids(&favorites), [TOKYO, LONDON, NEW_YORK]);
        assert_eq!(orders(&favorites), vec![0, 1, 2]);
        assert_eq!(favorites.first().unwrap().id, TOKYO);
    }

    #[test]
    fn test_add_errors() {
        let catalog = TimezoneCatalog::fallback();
        let mut favorites = favorites(&[TOKYO]);

        assert!(matches!(favorites.add(&catalog, "atlantis-capital"), Err(ClockError::NotFound(_))));
        assert!(matches!(favorites.add(&catalog, TOKYO), Err(ClockError::AlreadyFavorite(_))));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_reorder_to_front() {
        let mut favorites = favorites(&[TOKYO, LONDON, NEW_YORK]);

        let moved = favorites.reorder(NEW_YORK, 0).unwrap();
        assert_eq!(moved.order, 0);
        assert_eq!(ids(&favorites), [NEW_YORK, TOKYO, LONDON]);
        assert_eq!(orders(&favorites), vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_clamps_past_end() {
        let mut favorites = favorites(&[TOKYO, LONDON, NEW_YORK]);

        let moved = favorites.reorder(TOKYO, 99).unwrap();
        assert_eq!(moved.order, 2);
        assert_eq!(ids(&favorites), [LONDON, NEW_YORK, TOKYO]);
    }

    #[test]
    fn test_reorder_middle_and_unknown() {
        let mut favorites = favorites(&[TOKYO, LONDON, NEW_YORK]);

        favorites.reorder(TOKYO, 1).unwrap();
        assert_eq!(ids(&favorites), [LONDON, TOKYO, NEW_YORK]);
        assert!(matches!(favorites.reorder("nowhere", 0), Err(ClockError::NotFound(_))));
        assert_eq!(favorites.len(), 3);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut favorites = favorites(&[TOKYO, LONDON, NEW_YORK]);

        assert_eq!(favorites.remove(TOKYO).unwrap().id, TOKYO);
        assert_eq!(orders(&favorites), vec![0, 1]);
        assert!(!favorites.is_favorite(TOKYO));
        assert!(favorites.remove(TOKYO).is_err());
    }

    #[test]
    fn test_navigate_wraps() {
        let favorites = favorites(&[TOKYO, LONDON, NEW_YORK]);

        assert_eq!(favorites.navigate(NEW_YORK, Direction::Next).unwrap().id, TOKYO);
        assert_eq!(favorites.navigate(TOKYO, Direction::Previous).unwrap().id, NEW_YORK);
        assert!(matches!(
            FavoriteZones::new().navigate(TOKYO, Direction::Next),
            Err(ClockError::EmptyCollection("favorites"))
        ));
    }

    #[test]
    fn test_local_time() {
        let favorites = favorites(&[TOKYO]);
        let noon: TimeOfDay = "12:00".parse().unwrap();

        assert_eq!(favorites.local_time(TOKYO, noon).unwrap().to_string(), "21:00");
        assert!(favorites.local_time(LONDON, noon).is_err());
    }

    #[test]
    fn test_load_renumbers_and_skips_duplicates() {
        let mut stored = favorites(&[LONDON, TOKYO]).all();
        stored.push(stored[0].clone());
        stored[1].order = 7;

        let mut favorites = FavoriteZones::new();
        assert_eq!(favorites.load(stored), 2);
        assert_eq!(ids(&favorites), [LONDON, TOKYO]);
        assert_eq!(orders(&favorites), vec![0, 1]);
    }
}
