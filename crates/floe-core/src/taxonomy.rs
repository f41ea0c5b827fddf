// ABOUTME: Controlled vocabularies for dataset classification and expedition scoping.
// ABOUTME: Categories, ISO topics, and expedition types with their stable wire keys.

use serde::{Deserialize, Serialize};

use crate::spatial::BoundingBox;

/// Science category of a dataset. Keys match the portal's stored values
/// exactly; classification output is checked against this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Agriculture,
    Atmosphere,
    BiologicalClassification,
    Biosphere,
    ClimateIndicators,
    Cryosphere,
    HumanDimensions,
    LandSurface,
    Oceans,
    Paleoclimate,
    SolidEarth,
    SpectralEngineering,
    SunEarthInteractions,
    TerrestrialHydrosphere,
    MarineScience,
    TerrestrialScience,
    WindProfilerRadar,
    GeotectonicStudies,
    AudioSignals,
}

impl Category {
    pub const ALL: [Category; 19] = [
        Category::Agriculture,
        Category::Atmosphere,
        Category::BiologicalClassification,
        Category::Biosphere,
        Category::ClimateIndicators,
        Category::Cryosphere,
        Category::HumanDimensions,
        Category::LandSurface,
        Category::Oceans,
        Category::Paleoclimate,
        Category::SolidEarth,
        Category::SpectralEngineering,
        Category::SunEarthInteractions,
        Category::TerrestrialHydrosphere,
        Category::MarineScience,
        Category::TerrestrialScience,
        Category::WindProfilerRadar,
        Category::GeotectonicStudies,
        Category::AudioSignals,
    ];

    /// Stable storage/wire key, e.g. `"climate_indicators"`.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Agriculture => "agriculture",
            Category::Atmosphere => "atmosphere",
            Category::BiologicalClassification => "biological_classification",
            Category::Biosphere => "biosphere",
            Category::ClimateIndicators => "climate_indicators",
            Category::Cryosphere => "cryosphere",
            Category::HumanDimensions => "human_dimensions",
            Category::LandSurface => "land_surface",
            Category::Oceans => "oceans",
            Category::Paleoclimate => "paleoclimate",
            Category::SolidEarth => "solid_earth",
            Category::SpectralEngineering => "spectral_engineering",
            Category::SunEarthInteractions => "sun_earth_interactions",
            Category::TerrestrialHydrosphere => "terrestrial_hydrosphere",
            Category::MarineScience => "marine_science",
            Category::TerrestrialScience => "terrestrial_science",
            Category::WindProfilerRadar => "wind_profiler_radar",
            Category::GeotectonicStudies => "geotectonic_studies",
            Category::AudioSignals => "audio_signals",
        }
    }

    /// Human-readable display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Agriculture => "Agriculture",
            Category::Atmosphere => "Atmosphere",
            Category::BiologicalClassification => "Biological Classification",
            Category::Biosphere => "Biosphere",
            Category::ClimateIndicators => "Climate Indicators",
            Category::Cryosphere => "Cryosphere",
            Category::HumanDimensions => "Human Dimensions",
            Category::LandSurface => "Land Surface",
            Category::Oceans => "Oceans",
            Category::Paleoclimate => "Paleoclimate",
            Category::SolidEarth => "Solid Earth",
            Category::SpectralEngineering => "Spectral/Engineering",
            Category::SunEarthInteractions => "Sun-Earth Interactions",
            Category::TerrestrialHydrosphere => "Terrestrial Hydrosphere",
            Category::MarineScience => "Marine Science",
            Category::TerrestrialScience => "Terrestrial Science",
            Category::WindProfilerRadar => "Wind Profiler Radar",
            Category::GeotectonicStudies => "Geotectonic Studies",
            Category::AudioSignals => "Audio Signals",
        }
    }

    /// Look up a category by its stable key.
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.key() == key)
    }

    /// The sub-topics considered valid under this category. A classification
    /// topic outside this list is flagged by the validator.
    pub fn topics(&self) -> &'static [&'static str] {
        match self {
            Category::Agriculture => &[
                "Agriculture",
                "Atmosphere",
                "Biological Classification",
                "Biosphere",
                "Climate Indicators",
                "Cryosphere",
                "Human Dimensions",
                "Land Surface",
                "Oceans",
                "Paleoclimate",
                "Solid Earth",
                "Spectral/Engineering",
                "Sun-Earth Interactions",
                "Terrestrial Hydrosphere",
                "Marine Science",
                "Terrestrial Science",
                "Wind Profiler Radar",
                "Geotectonic Studies",
                "Audio Signals",
            ],
            Category::Atmosphere => &[
                "Aerosols",
                "Air Quality",
                "Altitude",
                "Atmospheric Chemistry",
                "Atmospheric Electricity",
                "Atmospheric Phenomena",
                "Atmospheric Pressure",
                "Atmospheric Radiation",
                "Atmospheric Temperature",
                "Atmospheric Water Vapor",
                "Atmospheric Winds",
                "Clouds",
                "Cryosphere",
                "Precipitation",
                "Wind Profiler Radar",
                "Atmospheric Ozone",
                "Ionosphere",
                "Global Electric Circuit",
            ],
            Category::BiologicalClassification => &[
                "Animals/Invertebrates",
                "Animals/Vertebrates",
                "Bacteria/Archaea",
                "Cryosphere",
                "Fungi",
                "Plants",
                "Protists",
                "Viruses",
            ],
            Category::Biosphere => &[
                "Aquatic Ecosystems",
                "Cryosphere",
                "Ecological Dynamics",
                "Terrestrial Ecosystems",
                "Vegetation",
                "Ocean/Lake Records",
            ],
            Category::ClimateIndicators => &[
                "Air Temperature Indices",
                "Cryosphere",
                "Drought/Precipitation Indices",
                "Humidity Indices",
                "Hydrologic/Ocean Indices",
                "Ocean/Sst Indices",
                "Teleconnections",
            ],
            Category::Cryosphere => &[
                "Cryosphere",
                "Frozen Ground",
                "Glaciers/Ice Sheets",
                "Sea Ice",
                "Snow/Ice",
            ],
            Category::HumanDimensions => &[
                "Attitudes/Preferences/Behavior",
                "Boundaries",
                "Cryosphere",
                "Economic Resources",
                "Environmental Impacts",
                "Habitat Conversion/Fragmentation",
                "Human Health",
                "Infrastructure",
                "Land Use/Land Cover",
                "Natural Hazards",
                "Population",
            ],
            Category::LandSurface => &[
                "Cryosphere",
                "Erosion/Sedimentation",
                "Frozen Ground",
                "Geomorphology",
                "Land Temperature",
                "Land Use/Land Cover",
                "Landscape",
                "Soils",
                "Surface Radiative Properties",
                "Topography",
                "Neo-tectonics",
            ],
            Category::Oceans => &[
                "Ocean/Lake Records",
                "Marine Biology",
                "Ocean Chemistry",
                "Hydrography",
                "Marine Environment Monitoring",
                "Ocean Acoustics",
                "Marine Sediments",
                "Aquatic Sciences",
                "Biogeochemistry",
                "Nutrients",
                "Chlorophyll A",
                "Paleoclimate Reconstructions",
                "Ice Core Records",
                "Land Records",
                "Cryosphere",
            ],
            Category::Paleoclimate => &[
                "Cryosphere",
                "Geodetics/Gravity",
                "Geomagnetism",
                "Geomorphology",
                "Geothermal",
                "Natural Resources",
                "Rocks/Minerals",
                "Seismology",
                "Tectonics",
                "Volcanoes",
                "Geo-Chemistry",
                "Paleo",
            ],
            Category::SolidEarth => &[
                "Cryosphere",
                "Gamma Ray",
                "Infrared Wavelengths",
                "Lidar",
                "Microwave",
                "Platform Characteristics",
                "Radar",
                "Radio Wave",
                "Sensor Characteristics",
                "Ultraviolet Wavelengths",
                "Visible Wavelengths",
                "X-Ray",
                "GPS",
                "Seismology",
                "Geomagnetism",
            ],
            Category::SpectralEngineering => &[
                "Cryosphere",
                "Ionosphere/Magnetosphere Dynamics",
                "Solar Activity",
                "Solar Energetic Particle Flux",
                "Solar Energetic Particle Properties",
            ],
            Category::SunEarthInteractions => &[
                "Cryosphere",
                "Glaciers/Ice Sheets",
                "Ground Water",
                "Snow/Ice",
                "Surface Water",
                "Water Quality/Water Chemistry",
                "Polar Ionosphere",
            ],
            Category::TerrestrialHydrosphere => &["Cryosphere"],
            Category::MarineScience => &[
                "Aquatic Sciences",
                "Bathymetry/Seafloor Topography",
                "Coastal Processes",
                "Cryosphere",
                "Marine Environment Monitoring",
                "Marine Geophysics",
                "Marine Sediments",
                "Marine Volcanism",
                "Ocean Acoustics",
                "Ocean Chemistry",
                "Ocean Circulation",
                "Ocean Heat Budget",
                "Ocean Optics",
                "Ocean Pressure",
                "Ocean Temperature",
                "Ocean Waves",
                "Ocean Winds",
                "Salinity/Density",
                "Sea Ice",
                "Sea Surface Topography",
                "Tides",
                "Water Quality",
                "Earth Science Test",
            ],
            Category::TerrestrialScience => &["Cryosphere"],
            Category::WindProfilerRadar => &["Atmospheric Science"],
            Category::GeotectonicStudies => &["Surveying & Mapping"],
            Category::AudioSignals => &["Physical data"],
        }
    }
}

/// ISO 19115 topic category. Keys use the standard's camelCase identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IsoTopic {
    ClimatologyMeteorologyAtmosphere,
    Oceans,
    Environment,
    GeoscientificInformation,
    ImageryBaseMapsEarthCover,
    InlandWaters,
    Location,
    Boundaries,
    Biota,
    Economy,
    Elevation,
    Farming,
    Health,
    IntelligenceMilitary,
    Society,
    Structure,
    Transportation,
    UtilitiesCommunication,
}

impl IsoTopic {
    pub const ALL: [IsoTopic; 18] = [
        IsoTopic::ClimatologyMeteorologyAtmosphere,
        IsoTopic::Oceans,
        IsoTopic::Environment,
        IsoTopic::GeoscientificInformation,
        IsoTopic::ImageryBaseMapsEarthCover,
        IsoTopic::InlandWaters,
        IsoTopic::Location,
        IsoTopic::Boundaries,
        IsoTopic::Biota,
        IsoTopic::Economy,
        IsoTopic::Elevation,
        IsoTopic::Farming,
        IsoTopic::Health,
        IsoTopic::IntelligenceMilitary,
        IsoTopic::Society,
        IsoTopic::Structure,
        IsoTopic::Transportation,
        IsoTopic::UtilitiesCommunication,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            IsoTopic::ClimatologyMeteorologyAtmosphere => "climatologyMeteorologyAtmosphere",
            IsoTopic::Oceans => "oceans",
            IsoTopic::Environment => "environment",
            IsoTopic::GeoscientificInformation => "geoscientificInformation",
            IsoTopic::ImageryBaseMapsEarthCover => "imageryBaseMapsEarthCover",
            IsoTopic::InlandWaters => "inlandWaters",
            IsoTopic::Location => "location",
            IsoTopic::Boundaries => "boundaries",
            IsoTopic::Biota => "biota",
            IsoTopic::Economy => "economy",
            IsoTopic::Elevation => "elevation",
            IsoTopic::Farming => "farming",
            IsoTopic::Health => "health",
            IsoTopic::IntelligenceMilitary => "intelligenceMilitary",
            IsoTopic::Society => "society",
            IsoTopic::Structure => "structure",
            IsoTopic::Transportation => "transportation",
            IsoTopic::UtilitiesCommunication => "utilitiesCommunication",
        }
    }

    pub fn from_key(key: &str) -> Option<IsoTopic> {
        IsoTopic::ALL.iter().copied().find(|t| t.key() == key)
    }
}

/// Expedition program a dataset belongs to. Determines the default spatial
/// extent used when extraction finds no explicit location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpeditionType {
    Antarctic,
    Arctic,
    SouthernOcean,
    Himalaya,
}

impl ExpeditionType {
    pub const ALL: [ExpeditionType; 4] = [
        ExpeditionType::Antarctic,
        ExpeditionType::Arctic,
        ExpeditionType::SouthernOcean,
        ExpeditionType::Himalaya,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ExpeditionType::Antarctic => "antarctic",
            ExpeditionType::Arctic => "arctic",
            ExpeditionType::SouthernOcean => "southern_ocean",
            ExpeditionType::Himalaya => "himalaya",
        }
    }

    /// Region adjective used in generated text, e.g. "Himalayan Glacier Mass Balance".
    pub fn label(&self) -> &'static str {
        match self {
            ExpeditionType::Antarctic => "Antarctic",
            ExpeditionType::Arctic => "Arctic",
            ExpeditionType::SouthernOcean => "Southern Ocean",
            ExpeditionType::Himalaya => "Himalayan",
        }
    }

    pub fn from_key(key: &str) -> Option<ExpeditionType> {
        ExpeditionType::ALL.iter().copied().find(|e| e.key() == key)
    }

    /// Default bounding box for datasets of this expedition type.
    pub fn default_bounds(&self) -> BoundingBox {
        match self {
            ExpeditionType::Antarctic => BoundingBox::new(-180.0, 180.0, -90.0, -60.0),
            ExpeditionType::Arctic => BoundingBox::new(-180.0, 180.0, 60.0, 90.0),
            ExpeditionType::SouthernOcean => BoundingBox::new(-180.0, 180.0, -78.0, -40.0),
            ExpeditionType::Himalaya => BoundingBox::new(73.0, 105.0, 26.0, 36.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_keys_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_key(cat.key()), Some(cat));
        }
        assert_eq!(Category::from_key("volcanology"), None);
    }

    #[test]
    fn category_serde_uses_wire_key() {
        let json = serde_json::to_string(&Category::SunEarthInteractions).unwrap();
        assert_eq!(json, "\"sun_earth_interactions\"");

        let parsed: Category = serde_json::from_str("\"biological_classification\"").unwrap();
        assert_eq!(parsed, Category::BiologicalClassification);
    }

    #[test]
    fn every_category_has_topics() {
        for cat in Category::ALL {
            assert!(
                !cat.topics().is_empty(),
                "category {} should have at least one topic",
                cat.key()
            );
        }
    }

    #[test]
    fn iso_topic_keys_round_trip() {
        for topic in IsoTopic::ALL {
            assert_eq!(IsoTopic::from_key(topic.key()), Some(topic));
        }
        let json = serde_json::to_string(&IsoTopic::ImageryBaseMapsEarthCover).unwrap();
        assert_eq!(json, "\"imageryBaseMapsEarthCover\"");
    }

    #[test]
    fn expedition_labels_and_defaults() {
        assert_eq!(ExpeditionType::Himalaya.label(), "Himalayan");
        assert_eq!(ExpeditionType::from_key("southern_ocean"), Some(ExpeditionType::SouthernOcean));

        let bounds = ExpeditionType::Antarctic.default_bounds();
        assert_eq!(bounds.north, -60.0);
        assert_eq!(bounds.south, -90.0);
        assert!(bounds.validate().is_ok());

        for exp in ExpeditionType::ALL {
            assert!(exp.default_bounds().validate().is_ok());
        }
    }
}
