//! Normalization of itemized place details into a [`CanonicalAddress`].
//!
//! Providers tag components inconsistently across regions: a US address
//! names its city with `locality`, a New York borough may only carry
//! `sublocality`, UK addresses use `postal_town`, and some rural places
//! only have `administrative_area_level_3`. The city is taken from the
//! highest-priority kind present anywhere in the component list, in this
//! order:
//!
//! 1. `locality`
//! 2. `sublocality`
//! 3. `postal_town`
//! 4. `administrative_area_level_3`
//!
//! Within one kind the first component wins. Every kind on a component is
//! considered on its own, so a component tagged `locality` and `political`
//! counts once, as a locality.

use tracing::debug;

use crate::models::{CanonicalAddress, ComponentKind, PlaceDetail, RawComponent};

const CITY_PRIORITY: [ComponentKind; 4] = [
    ComponentKind::Locality,
    ComponentKind::Sublocality,
    ComponentKind::PostalTown,
    ComponentKind::AdministrativeAreaLevel3,
];

#[derive(Default)]
struct Slots<'a> {
    street_number: Option<&'a str>,
    route: Option<&'a str>,
    state: Option<&'a str>,
    zip: Option<&'a str>,
    /// One candidate per entry in `CITY_PRIORITY`
    city: [Option<&'a str>; 4],
}

/// Map a place detail to its canonical address.
///
/// Total and deterministic: missing components yield empty fields, never
/// an error.
pub fn normalize_address(detail: &PlaceDetail) -> CanonicalAddress {
    let mut slots = Slots::default();

    for component in &detail.components {
        for kind in &component.kinds {
            match kind {
                ComponentKind::StreetNumber => fill(&mut slots.street_number, &component.long_name),
                ComponentKind::Route => fill(&mut slots.route, &component.long_name),
                ComponentKind::AdministrativeAreaLevel1 => {
                    fill(&mut slots.state, state_name(component))
                }
                ComponentKind::PostalCode => fill(&mut slots.zip, &component.long_name),
                kind => {
                    if let Some(rank) = CITY_PRIORITY.iter().position(|k| k == kind) {
                        fill(&mut slots.city[rank], &component.long_name);
                    }
                }
            }
        }
    }

    let street = [slots.street_number, slots.route]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let address = CanonicalAddress {
        street,
        city: slots.city.into_iter().flatten().next().unwrap_or_default().to_string(),
        state: slots.state.unwrap_or_default().to_string(),
        zip: slots.zip.unwrap_or_default().to_string(),
    };

    log_gaps(detail, &address);
    address
}

/// First non-blank value wins
fn fill<'a>(slot: &mut Option<&'a str>, value: &'a str) {
    let value = value.trim();
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value);
    }
}

/// States are reported by abbreviation ("NY"), falling back to the long
/// name when a provider leaves the short name blank.
fn state_name(component: &RawComponent) -> &str {
    if component.short_name.trim().is_empty() {
        &component.long_name
    } else {
        &component.short_name
    }
}

fn log_gaps(detail: &PlaceDetail, address: &CanonicalAddress) {
    for (field, value) in [
        ("street", &address.street),
        ("city", &address.city),
        ("state", &address.state),
        ("zip", &address.zip),
    ] {
        if value.is_empty() {
            debug!(
                "Normalization gap: no {} component for {:?}",
                field, detail.formatted_label
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComponentKind::*;

    fn detail(components: Vec<RawComponent>) -> PlaceDetail {
        PlaceDetail {
            formatted_label: "test".to_string(),
            components,
        }
    }

    #[test]
    fn test_full_us_address() {
        let detail = detail(vec![
            RawComponent::new("149", "149", &[StreetNumber]),
            RawComponent::new("Skillman Street", "Skillman St", &[Route]),
            RawComponent::new("Brooklyn", "Brooklyn", &[Locality]),
            RawComponent::new("New York", "NY", &[AdministrativeAreaLevel1]),
            RawComponent::new("11205", "11205", &[PostalCode]),
        ]);

        assert_eq!(
            normalize_address(&detail),
            CanonicalAddress {
                street: "149 Skillman Street".into(),
                city: "Brooklyn".into(),
                state: "NY".into(),
                zip: "11205".into(),
            }
        );
    }

    #[test]
    fn test_empty_detail_yields_empty_fields() {
        let address = normalize_address(&PlaceDetail::default());
        assert_eq!(address, CanonicalAddress::default());
    }

    #[test]
    fn test_postal_town_beats_admin_level_3() {
        let detail = detail(vec![
            RawComponent::new("Kirkby", "Kirkby", &[AdministrativeAreaLevel3]),
            RawComponent::new("Liverpool", "Liverpool", &[PostalTown]),
        ]);
        assert_eq!(normalize_address(&detail).city, "Liverpool");
    }

    #[test]
    fn test_locality_wins_even_when_listed_last() {
        let detail = detail(vec![
            RawComponent::new("Williamsburg", "Williamsburg", &[Sublocality]),
            RawComponent::new("Greenpoint", "Greenpoint", &[PostalTown]),
            RawComponent::new("New York", "New York", &[Locality]),
        ]);
        assert_eq!(normalize_address(&detail).city, "New York");
    }

    #[test]
    fn test_first_component_of_a_kind_wins() {
        let detail = detail(vec![
            RawComponent::new("Brooklyn", "Brooklyn", &[Sublocality]),
            RawComponent::new("Queens", "Queens", &[Sublocality]),
            RawComponent::new("11205", "11205", &[PostalCode]),
            RawComponent::new("11206", "11206", &[PostalCode]),
        ]);

        let address = normalize_address(&detail);
        assert_eq!(address.city, "Brooklyn");
        assert_eq!(address.zip, "11205");
    }

    #[test]
    fn test_multi_kind_component_counts_per_kind() {
        let detail = detail(vec![
            RawComponent::new("Brooklyn", "Brooklyn", &[Sublocality, Other]),
            RawComponent::new("New York", "New York", &[Locality, Other]),
        ]);
        assert_eq!(normalize_address(&detail).city, "New York");
    }

    #[test]
    fn test_street_collapses_missing_parts() {
        let route_only = detail(vec![RawComponent::new(" Main Street ", "Main St", &[Route])]);
        assert_eq!(normalize_address(&route_only).street, "Main Street");

        let number_only = detail(vec![RawComponent::new("42", "42", &[StreetNumber])]);
        assert_eq!(normalize_address(&number_only).street, "42");

        // Route listed before the number still yields "number route"
        let reversed = detail(vec![
            RawComponent::new("Main Street", "Main St", &[Route]),
            RawComponent::new("42", "42", &[StreetNumber]),
        ]);
        assert_eq!(normalize_address(&reversed).street, "42 Main Street");
    }

    #[test]
    fn test_blank_values_do_not_claim_a_slot() {
        let detail = detail(vec![
            RawComponent::new("", "", &[Locality]),
            RawComponent::new("Hackney", "Hackney", &[Sublocality]),
            RawComponent::new("Texas", "", &[AdministrativeAreaLevel1]),
        ]);

        let address = normalize_address(&detail);
        assert_eq!(address.city, "Hackney");
        assert_eq!(address.state, "Texas");
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let detail = detail(vec![
            RawComponent::new("7", "7", &[StreetNumber]),
            RawComponent::new("Rue de Rivoli", "Rue de Rivoli", &[Route]),
            RawComponent::new("Paris", "Paris", &[Locality]),
            RawComponent::new("75001", "75001", &[PostalCode]),
        ]);

        assert_eq!(normalize_address(&detail), normalize_address(&detail));
    }
}
