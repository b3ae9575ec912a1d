//! Static option lists for the form's select fields

pub const COUNTRIES: &[&str] = &[
    "Turkey", "Australia", "Spain", "Indonesia", "United Kingdom", "Italy", "Pakistan",
    "Austria", "Netherlands", "India", "France", "Brazil", "China", "Singapore", "Argentina",
    "Poland", "Germany", "Canada", "Thailand", "Hungary", "Malaysia", "Denmark", "Taiwan",
    "Russia", "Nigeria", "Belgium", "South Korea", "Chile", "Ireland", "Philippines", "Greece",
    "Mexico", "Montenegro", "United States", "Bangladesh", "Japan", "Slovenia", "Czechia",
    "Sweden", "United Arab Emirates", "Switzerland", "Portugal", "Peru", "Hong Kong", "Vietnam",
    "Sri Lanka", "Serbia", "Norway", "Romania", "Kenya", "Ukraine", "Israel", "Slovakia",
    "Lithuania", "Puerto Rico", "Bosnia & Herzegovina", "Croatia", "South Africa", "Paraguay",
    "Others", "Colombia", "Uruguay", "Algeria", "Finland", "Guatemala", "Egypt", "Malta",
    "Bulgaria", "New Zealand", "Kuwait", "Uzbekistan", "Saudi Arabia", "Cyprus", "Estonia",
    "Côte d’Ivoire", "Morocco", "Tunisia", "Venezuela", "Dominican Republic", "Senegal",
    "Costa Rica", "Kazakhstan", "Macedonia (FYROM)", "Oman", "Laos", "Ethiopia", "Panama",
    "Belarus", "Myanmar (Burma)", "Moldova", "Bahrain", "Mongolia", "Ghana", "Albania", "Kosovo",
    "Georgia", "Tanzania", "Bolivia", "Cambodia", "Iraq", "Jordan", "Lebanon", "Ecuador",
    "Jamaica", "Trinidad & Tobago", "Libya", "El Salvador", "Azerbaijan", "Nicaragua",
    "Palestine", "Réunion", "Iceland", "Armenia", "Uganda", "Qatar", "Cameroon", "Latvia",
    "Congo - Kinshasa", "Kyrgyzstan", "Honduras", "Nepal", "Luxembourg", "Sudan", "Yemen",
    "Macau",
];

pub const CONTINENTS: &[&str] = &["Asia", "Oceania", "Europe", "Americas", "Africa"];

pub const BROWSERS: &[&str] = &[
    "Chrome", "Safari", "Firefox", "Internet Explorer", "Edge", "Android Webview",
    "Safari (in-app)", "Opera Mini", "Opera", "UC Browser", "YaBrowser", "Coc Coc",
    "Amazon Silk", "Android Browser", "Mozilla Compatible Agent", "MRCHROME", "Maxthon",
    "BlackBerry", "Nintendo Browser",
];

pub const SUBCONTINENTS: &[&str] = &[
    "Western Asia", "Australasia", "Southern Europe", "Southeast Asia", "Northern Europe",
    "Southern Asia", "Western Europe", "South America", "Eastern Asia", "Eastern Europe",
    "Northern America", "Western Africa", "Central America", "Eastern Africa", "(not set)",
    "Caribbean", "Southern Africa", "Northern Africa", "Central Asia", "Middle Africa",
    "Melanesia", "Micronesian Region", "Polynesia",
];

pub const OPERATING_SYSTEMS: &[&str] = &[
    "Windows", "Macintosh", "Linux", "Android", "iOS", "Chrome OS", "BlackBerry", "(not set)",
    "Samsung", "Windows Phone", "Xbox", "Nintendo Wii", "Firefox OS", "Nintendo WiiU", "FreeBSD",
    "Nokia", "NTT DoCoMo", "Nintendo 3DS", "SunOS", "OpenBSD",
];

pub const MEDIUMS: &[&str] = &["organic", "referral", "cpc", "affiliate", "cpm"];

/// A `<select>` field rendered on the form
#[derive(Debug, Clone, Copy)]
pub struct SelectField {
    /// Form key, also the model column name
    pub name: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

/// Select fields in form order
pub const SELECT_FIELDS: &[SelectField] = &[
    SelectField { name: "country", label: "Country", options: COUNTRIES },
    SelectField { name: "continent", label: "Continent", options: CONTINENTS },
    SelectField { name: "browser", label: "Browser", options: BROWSERS },
    SelectField { name: "subContinent", label: "Sub-continent", options: SUBCONTINENTS },
    SelectField { name: "operatingSystem", label: "Operating system", options: OPERATING_SYSTEMS },
    SelectField { name: "medium", label: "Medium", options: MEDIUMS },
];
