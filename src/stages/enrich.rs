use std::{sync::Arc, time::Duration};

use log::info;

use crate::{
    clients::{cerema::Cerema, reference::CommuneReference, retry::RetryFetch, wikidata::Wikidata},
    config::Config,
    enrich::{
        cities::{collect_cities, read_city_points, write_cities_csv},
        foncier::{
            fetch_geomutations, fetch_indicators, indicator_columns, select_communes, write_rows,
        },
    },
};

pub async fn enrich_cities(config: Arc<Config>) -> anyhow::Result<()> {
    let wikidata = Wikidata::new(RetryFetch::new(&config)?, &config.wikidata_endpoint);
    let cities = collect_cities(&wikidata, &config).await;
    write_cities_csv(&config.path(&config.cities_csv), &cities)?;
    Ok(())
}

/*
   Needs the cities CSV of `enrich_cities`. Writes the yearly indicators of
   every commune within the foncier radius and the geomutations of the
   configured bounding box.
*/
pub async fn foncier(config: Arc<Config>) -> anyhow::Result<()> {
    let fetch = RetryFetch::new(&config)?;
    let insee = CommuneReference::download(&fetch, &config.insee_codes_url).await?;
    let cities = read_city_points(&config.path(&config.cities_csv))?;

    let reference = (config.reference_latitude, config.reference_longitude);
    let codes = select_communes(&cities, reference, config.foncier_radius_km, &insee);
    info!(
        "{} communes with an INSEE code within {} km",
        codes.len(),
        config.foncier_radius_km
    );

    let cerema = Cerema::new(fetch, &config.cerema_indicators_url, config.cerema_token.clone());
    let indicators = fetch_indicators(
        &cerema,
        &codes,
        config.year_from as i64,
        config.year_to as i64,
        Duration::from_secs(1),
    )
    .await;
    write_rows(
        &config.path(&config.indicators_csv),
        &indicators,
        &indicator_columns(),
    )?;

    let geomutations = fetch_geomutations(&cerema, &config.geomutations_url).await;
    write_rows(&config.path(&config.geometries_csv), &geomutations, &[])?;
    Ok(())
}
