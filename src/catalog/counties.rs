use serde::Serialize;

/// The 47 counties, alphabetically.
pub const KENYAN_COUNTIES: [&str; 47] = [
    "Baringo",
    "Bomet",
    "Bungoma",
    "Busia",
    "Elgeyo-Marakwet",
    "Embu",
    "Garissa",
    "Homa Bay",
    "Isiolo",
    "Kajiado",
    "Kakamega",
    "Kericho",
    "Kiambu",
    "Kilifi",
    "Kirinyaga",
    "Kisii",
    "Kisumu",
    "Kitui",
    "Kwale",
    "Laikipia",
    "Lamu",
    "Machakos",
    "Makueni",
    "Mandera",
    "Marsabit",
    "Meru",
    "Migori",
    "Mombasa",
    "Murang'a",
    "Nairobi",
    "Nakuru",
    "Nandi",
    "Narok",
    "Nyamira",
    "Nyandarua",
    "Nyeri",
    "Samburu",
    "Siaya",
    "Taita-Taveta",
    "Tana River",
    "Tharaka-Nithi",
    "Trans Nzoia",
    "Turkana",
    "Uasin Gishu",
    "Vihiga",
    "Wajir",
    "West Pokot",
];

const SUGGESTION_LIMIT: usize = 10;
const SUGGESTION_LIMIT_WITH_ROUTES: usize = 5;

/// Autocomplete payload for the county/route search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountySuggestions {
    pub counties: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<&'static str>,
}

/// Popular "From to To" labels for a county, if it has any.
pub fn popular_routes(county: &str) -> &'static [&'static str] {
    COUNTY_ROUTES
        .iter()
        .find(|(name, _)| *name == county)
        .map(|(_, routes)| *routes)
        .unwrap_or(&[])
}

/// Counties containing `input` (case-insensitive) plus the popular routes of an exact match.
pub fn suggest(input: &str) -> CountySuggestions {
    let needle = input.trim().to_lowercase();

    let routes = KENYAN_COUNTIES
        .iter()
        .find(|county| county.to_lowercase() == needle)
        .map(|county| popular_routes(county).to_vec())
        .unwrap_or_default();

    let limit = if routes.is_empty() {
        SUGGESTION_LIMIT
    } else {
        SUGGESTION_LIMIT_WITH_ROUTES
    };

    let counties = KENYAN_COUNTIES
        .iter()
        .copied()
        .filter(|county| county.to_lowercase().contains(&needle))
        .take(limit)
        .collect();

    CountySuggestions { counties, routes }
}

/// Split a "From to To" route label into its endpoints.
pub fn parse_route_label(label: &str) -> Option<(&str, &str)> {
    let (from, to) = label.split_once(" to ")?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some((from, to))
}

type CountyRoutes = (&'static str, &'static [&'static str]);

const COUNTY_ROUTES: [CountyRoutes; 44] = [
    (
        "Nairobi",
        &[
            "CBD to Westlands",
            "CBD to Karen",
            "CBD to Kileleshwa",
            "Westlands to Karen",
            "CBD to Rongai",
            "CBD to Kasarani",
            "CBD to Eastleigh",
            "CBD to South B",
            "CBD to Ngong",
            "CBD to Thika Road",
            "Juja to CBD",
            "Thika to CBD",
            "Limuru to CBD",
            "Kiambu to CBD",
            "Ruiru to CBD",
        ],
    ),
    (
        "Kisumu",
        &[
            "Town to Mega City",
            "Town to Industrial Area",
            "Town to Kisumu Airport",
            "Town to Ahero",
            "Town to Muhoroni",
            "Town to Nyakach",
        ],
    ),
    (
        "Mombasa",
        &[
            "Nyali to CBD",
            "South Coast to CBD",
            "Kilifi to CBD",
            "Malindi to CBD",
            "Lamu to CBD",
            "Voi to CBD",
            "Taveta to CBD",
        ],
    ),
    (
        "Nakuru",
        &[
            "Town to Naivasha",
            "Town to Industrial Area",
            "Town to Gilgil",
            "Town to Elementaita",
            "Town to Molo",
        ],
    ),
    (
        "Eldoret",
        &[
            "Town to Moi University",
            "Town to Industrial Area",
            "Town to Turbo",
            "Town to Kapsabet",
            "Town to Kitale",
        ],
    ),
    (
        "Uasin Gishu",
        &[
            "Eldoret to Moi University",
            "Eldoret to Turbo",
            "Eldoret to Kapsabet",
            "Eldoret to Kitale",
        ],
    ),
    ("Kiambu", &["Town to CBD", "Town to Limuru", "Town to Ruiru", "Town to Thika"]),
    ("Machakos", &["Town to CBD", "Town to Athi River", "Town to Kangundo"]),
    ("Kajiado", &["Town to CBD", "Town to Ngong", "Town to Kitengela"]),
    ("Murang'a", &["Town to CBD", "Town to Thika", "Town to Kandara"]),
    ("Nyeri", &["Town to CBD", "Town to Nanyuki", "Town to Karatina"]),
    ("Kirinyaga", &["Town to CBD", "Town to Kerugoya", "Town to Sagana"]),
    ("Embu", &["Town to CBD", "Town to Runyenjes", "Town to Siakago"]),
    ("Kitui", &["Town to CBD", "Town to Mwingi", "Town to Mutomo"]),
    ("Meru", &["Town to CBD", "Town to Maua", "Town to Chuka"]),
    ("Tharaka-Nithi", &["Town to CBD", "Town to Chuka", "Town to Maara"]),
    ("Laikipia", &["Nanyuki to CBD", "Nanyuki to Nyahururu", "Nanyuki to Dol Dol"]),
    ("Isiolo", &["Town to CBD", "Town to Garbatulla", "Town to Merti"]),
    ("Marsabit", &["Town to CBD", "Town to Moyale", "Town to Sololo"]),
    ("Wajir", &["Town to CBD", "Town to Habaswein", "Town to Wajir Bor"]),
    ("Garissa", &["Town to CBD", "Town to Dadaab", "Town to Ijara"]),
    ("Mandera", &["Town to CBD", "Town to El Wak", "Town to Takaba"]),
    ("Bungoma", &["Town to CBD", "Town to Webuye", "Town to Malakisi"]),
    ("Busia", &["Town to CBD", "Town to Malaba", "Town to Port Victoria"]),
    ("Siaya", &["Town to CBD", "Town to Bondo", "Town to Yala"]),
    ("Kakamega", &["Town to CBD", "Town to Mumias", "Town to Butere"]),
    ("Vihiga", &["Town to CBD", "Town to Chavakali", "Town to Luanda"]),
    ("Nandi", &["Kapsabet to CBD", "Kapsabet to Nandi Hills", "Kapsabet to Mosoriot"]),
    ("Trans Nzoia", &["Kitale to CBD", "Kitale to Endebess", "Kitale to Kwanza"]),
    ("West Pokot", &["Kapenguria to CBD", "Kapenguria to Ortum", "Kapenguria to Sigor"]),
    ("Samburu", &["Maralal to CBD", "Maralal to Baragoi", "Maralal to Wamba"]),
    ("Turkana", &["Lodwar to CBD", "Lodwar to Kakuma", "Lodwar to Lokichoggio"]),
    ("Narok", &["Town to CBD", "Town to Kilgoris", "Town to Ololulung'a"]),
    ("Kericho", &["Town to CBD", "Town to Kipkelion", "Town to Londiani"]),
    ("Bomet", &["Town to CBD", "Town to Sotik", "Town to Chepalungu"]),
    ("Homa Bay", &["Town to CBD", "Town to Mbita", "Town to Ndhiwa"]),
    ("Migori", &["Town to CBD", "Town to Isebania", "Town to Kehancha"]),
    ("Kisii", &["Town to CBD", "Town to Keroka", "Town to Nyamache"]),
    ("Nyamira", &["Town to CBD", "Town to Manga", "Town to Nyansiongo"]),
    ("Taita Taveta", &["Voi to CBD", "Voi to Taveta", "Voi to Mwatate"]),
    ("Kwale", &["Ukunda to CBD", "Ukunda to Diani", "Ukunda to Lunga Lunga"]),
    ("Kilifi", &["Town to CBD", "Town to Malindi", "Town to Watamu"]),
    ("Tana River", &["Hola to CBD", "Hola to Garsen", "Hola to Kipini"]),
    ("Lamu", &["Town to CBD", "Town to Hindi", "Town to Kiunga"]),
];
