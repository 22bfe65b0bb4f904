//! The fetch → aggregate → render pipeline

use tracing::{debug, info, instrument};

use crate::aggregate::aggregate_center;
use crate::locator::AddressSearch;
use crate::models::{Coordinate, DisplayObject, LocationFeature, MapSettings, MapView, Marker};
use crate::Result;

/// Build a map view from already fetched features.
///
/// Center and markers come from the same slice, one marker per feature in
/// response order.
pub fn build_view(
    place: &str,
    features: &[LocationFeature],
    settings: &MapSettings,
) -> Result<MapView> {
    let coordinates: Vec<Coordinate> = features.iter().map(LocationFeature::coordinate).collect();
    let center = aggregate_center(place, &coordinates)?;

    let markers = features
        .iter()
        .zip(coordinates)
        .map(|(feature, position)| Marker {
            position,
            tooltip: feature.label(),
        })
        .collect();

    Ok(MapView {
        center,
        zoom: settings.zoom,
        markers,
    })
}

/// Run the whole pipeline for one place name
#[instrument(skip(locator, settings))]
pub async fn render<L>(locator: &L, place: &str, settings: &MapSettings) -> Result<DisplayObject>
where
    L: AddressSearch + ?Sized,
{
    let features = locator.search(place).await?;
    debug!("Building map from {} features", features.len());

    let view = build_view(place, &features, settings)?;
    info!(
        "Rendered '{}' with {} markers centered at {}",
        place,
        view.markers.len(),
        view.center.format_coordinates()
    );

    Ok(DisplayObject::new(place, view, settings))
}
