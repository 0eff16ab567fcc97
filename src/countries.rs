//! ISO 3166-1 alpha-2 lookup by country name.
//!
//! Names are matched case-insensitively against the English short name,
//! common English aliases, and a handful of widely used endonyms.

/// `(alpha-2 code, names)`; the first name is the English short name.
const COUNTRIES: &[(&str, &[&str])] = &[
    ("AF", &["Afghanistan"]),
    ("AX", &["Åland Islands", "Aland Islands", "Aland"]),
    ("AL", &["Albania", "Shqipëria"]),
    ("DZ", &["Algeria"]),
    ("AS", &["American Samoa"]),
    ("AD", &["Andorra"]),
    ("AO", &["Angola"]),
    ("AI", &["Anguilla"]),
    ("AQ", &["Antarctica"]),
    ("AG", &["Antigua and Barbuda", "Antigua"]),
    ("AR", &["Argentina"]),
    ("AM", &["Armenia"]),
    ("AW", &["Aruba"]),
    ("AU", &["Australia"]),
    ("AT", &["Austria", "Österreich", "Osterreich"]),
    ("AZ", &["Azerbaijan"]),
    ("BS", &["Bahamas"]),
    ("BH", &["Bahrain"]),
    ("BD", &["Bangladesh"]),
    ("BB", &["Barbados"]),
    ("BY", &["Belarus"]),
    ("BE", &["Belgium", "België", "Belgique", "Belgien"]),
    ("BZ", &["Belize"]),
    ("BJ", &["Benin"]),
    ("BM", &["Bermuda"]),
    ("BT", &["Bhutan"]),
    ("BO", &["Bolivia"]),
    ("BQ", &["Bonaire, Sint Eustatius and Saba", "Bonaire"]),
    ("BA", &["Bosnia and Herzegovina", "Bosnia"]),
    ("BW", &["Botswana"]),
    ("BV", &["Bouvet Island"]),
    ("BR", &["Brazil", "Brasil"]),
    ("IO", &["British Indian Ocean Territory"]),
    ("BN", &["Brunei Darussalam", "Brunei"]),
    ("BG", &["Bulgaria"]),
    ("BF", &["Burkina Faso"]),
    ("BI", &["Burundi"]),
    ("CV", &["Cabo Verde", "Cape Verde"]),
    ("KH", &["Cambodia"]),
    ("CM", &["Cameroon"]),
    ("CA", &["Canada"]),
    ("KY", &["Cayman Islands"]),
    ("CF", &["Central African Republic"]),
    ("TD", &["Chad"]),
    ("CL", &["Chile"]),
    ("CN", &["China", "PRC"]),
    ("CX", &["Christmas Island"]),
    ("CC", &["Cocos (Keeling) Islands"]),
    ("CO", &["Colombia"]),
    ("KM", &["Comoros"]),
    ("CG", &["Congo"]),
    ("CD", &["Congo, the Democratic Republic of the", "DRC"]),
    ("CK", &["Cook Islands"]),
    ("CR", &["Costa Rica"]),
    ("CI", &["Côte d'Ivoire", "Ivory Coast"]),
    ("HR", &["Croatia", "Hrvatska"]),
    ("CU", &["Cuba"]),
    ("CW", &["Curaçao", "Curacao"]),
    ("CY", &["Cyprus"]),
    ("CZ", &["Czechia", "Czech Republic", "Česko"]),
    ("DK", &["Denmark", "Danmark"]),
    ("DJ", &["Djibouti"]),
    ("DM", &["Dominica"]),
    ("DO", &["Dominican Republic"]),
    ("EC", &["Ecuador"]),
    ("EG", &["Egypt"]),
    ("SV", &["El Salvador"]),
    ("GQ", &["Equatorial Guinea"]),
    ("ER", &["Eritrea"]),
    ("EE", &["Estonia", "Eesti"]),
    ("SZ", &["Eswatini", "Swaziland"]),
    ("ET", &["Ethiopia"]),
    ("FK", &["Falkland Islands (Malvinas)", "Falklands"]),
    ("FO", &["Faroe Islands"]),
    ("FJ", &["Fiji"]),
    ("FI", &["Finland", "Suomi"]),
    ("FR", &["France"]),
    ("GF", &["French Guiana"]),
    ("PF", &["French Polynesia"]),
    ("TF", &["French Southern Territories"]),
    ("GA", &["Gabon"]),
    ("GM", &["Gambia"]),
    ("GE", &["Georgia"]),
    ("DE", &["Germany", "Deutschland"]),
    ("GH", &["Ghana"]),
    ("GI", &["Gibraltar"]),
    ("GR", &["Greece", "Hellas"]),
    ("GL", &["Greenland"]),
    ("GD", &["Grenada"]),
    ("GP", &["Guadeloupe"]),
    ("GU", &["Guam"]),
    ("GT", &["Guatemala"]),
    ("GG", &["Guernsey"]),
    ("GN", &["Guinea"]),
    ("GW", &["Guinea-Bissau"]),
    ("GY", &["Guyana"]),
    ("HT", &["Haiti"]),
    ("HM", &["Heard Island and McDonald Islands"]),
    ("VA", &["Holy See", "Vatican"]),
    ("HN", &["Honduras"]),
    ("HK", &["Hong Kong"]),
    ("HU", &["Hungary", "Magyarország"]),
    ("IS", &["Iceland", "Ísland"]),
    ("IN", &["India", "Bharat"]),
    ("ID", &["Indonesia"]),
    ("IR", &["Iran, Islamic Republic of", "Iran"]),
    ("IQ", &["Iraq"]),
    ("IE", &["Ireland", "Éire", "Eire"]),
    ("IM", &["Isle of Man"]),
    ("IL", &["Israel"]),
    ("IT", &["Italy", "Italia"]),
    ("JM", &["Jamaica"]),
    ("JP", &["Japan", "Nippon"]),
    ("JE", &["Jersey"]),
    ("JO", &["Jordan"]),
    ("KZ", &["Kazakhstan"]),
    ("KE", &["Kenya"]),
    ("KI", &["Kiribati"]),
    ("KP", &["Korea, Democratic People's Republic of", "North Korea"]),
    ("KR", &["Korea, Republic of", "South Korea", "Korea"]),
    ("KW", &["Kuwait"]),
    ("KG", &["Kyrgyzstan"]),
    ("LA", &["Lao People's Democratic Republic", "Laos"]),
    ("LV", &["Latvia", "Latvija"]),
    ("LB", &["Lebanon"]),
    ("LS", &["Lesotho"]),
    ("LR", &["Liberia"]),
    ("LY", &["Libya"]),
    ("LI", &["Liechtenstein"]),
    ("LT", &["Lithuania", "Lietuva"]),
    ("LU", &["Luxembourg"]),
    ("MO", &["Macao", "Macau"]),
    ("MG", &["Madagascar"]),
    ("MW", &["Malawi"]),
    ("MY", &["Malaysia"]),
    ("MV", &["Maldives"]),
    ("ML", &["Mali"]),
    ("MT", &["Malta"]),
    ("MH", &["Marshall Islands"]),
    ("MQ", &["Martinique"]),
    ("MR", &["Mauritania"]),
    ("MU", &["Mauritius"]),
    ("YT", &["Mayotte"]),
    ("MX", &["Mexico", "México"]),
    ("FM", &["Micronesia, Federated States of", "Micronesia"]),
    ("MD", &["Moldova, Republic of", "Moldova"]),
    ("MC", &["Monaco"]),
    ("MN", &["Mongolia"]),
    ("ME", &["Montenegro"]),
    ("MS", &["Montserrat"]),
    ("MA", &["Morocco"]),
    ("MZ", &["Mozambique"]),
    ("MM", &["Myanmar", "Burma"]),
    ("NA", &["Namibia"]),
    ("NR", &["Nauru"]),
    ("NP", &["Nepal"]),
    ("NL", &["Netherlands", "Holland", "Nederland"]),
    ("NC", &["New Caledonia"]),
    ("NZ", &["New Zealand", "Aotearoa"]),
    ("NI", &["Nicaragua"]),
    ("NE", &["Niger"]),
    ("NG", &["Nigeria"]),
    ("NU", &["Niue"]),
    ("NF", &["Norfolk Island"]),
    ("MK", &["North Macedonia", "Macedonia"]),
    ("MP", &["Northern Mariana Islands"]),
    ("NO", &["Norway", "Norge", "Noreg"]),
    ("OM", &["Oman"]),
    ("PK", &["Pakistan"]),
    ("PW", &["Palau"]),
    ("PS", &["Palestine, State of", "Palestine"]),
    ("PA", &["Panama"]),
    ("PG", &["Papua New Guinea"]),
    ("PY", &["Paraguay"]),
    ("PE", &["Peru"]),
    ("PH", &["Philippines", "Pilipinas"]),
    ("PN", &["Pitcairn"]),
    ("PL", &["Poland", "Polska"]),
    ("PT", &["Portugal"]),
    ("PR", &["Puerto Rico"]),
    ("QA", &["Qatar"]),
    ("RE", &["Réunion", "Reunion"]),
    ("RO", &["Romania", "România"]),
    ("RU", &["Russian Federation", "Russia", "Rossiya"]),
    ("RW", &["Rwanda"]),
    ("BL", &["Saint Barthélemy"]),
    ("SH", &["Saint Helena, Ascension and Tristan da Cunha"]),
    ("KN", &["Saint Kitts and Nevis"]),
    ("LC", &["Saint Lucia"]),
    ("MF", &["Saint Martin (French part)"]),
    ("PM", &["Saint Pierre and Miquelon"]),
    ("VC", &["Saint Vincent and the Grenadines"]),
    ("WS", &["Samoa"]),
    ("SM", &["San Marino"]),
    ("ST", &["Sao Tome and Principe"]),
    ("SA", &["Saudi Arabia"]),
    ("SN", &["Senegal"]),
    ("RS", &["Serbia", "Srbija"]),
    ("SC", &["Seychelles"]),
    ("SL", &["Sierra Leone"]),
    ("SG", &["Singapore"]),
    ("SX", &["Sint Maarten (Dutch part)"]),
    ("SK", &["Slovakia", "Slovensko"]),
    ("SI", &["Slovenia", "Slovenija"]),
    ("SB", &["Solomon Islands"]),
    ("SO", &["Somalia"]),
    ("ZA", &["South Africa"]),
    ("GS", &["South Georgia and the South Sandwich Islands"]),
    ("SS", &["South Sudan"]),
    ("ES", &["Spain", "España", "Espana"]),
    ("LK", &["Sri Lanka"]),
    ("SD", &["Sudan"]),
    ("SR", &["Suriname"]),
    ("SJ", &["Svalbard and Jan Mayen"]),
    ("SE", &["Sweden", "Sverige"]),
    ("CH", &["Switzerland", "Schweiz", "Suisse", "Svizzera"]),
    ("SY", &["Syrian Arab Republic", "Syria"]),
    ("TW", &["Taiwan, Province of China", "Taiwan"]),
    ("TJ", &["Tajikistan"]),
    ("TZ", &["Tanzania, United Republic of", "Tanzania"]),
    ("TH", &["Thailand"]),
    ("TL", &["Timor-Leste", "East Timor"]),
    ("TG", &["Togo"]),
    ("TK", &["Tokelau"]),
    ("TO", &["Tonga"]),
    ("TT", &["Trinidad and Tobago"]),
    ("TN", &["Tunisia"]),
    ("TR", &["Türkiye", "Turkey", "Turkiye"]),
    ("TM", &["Turkmenistan"]),
    ("TC", &["Turks and Caicos Islands"]),
    ("TV", &["Tuvalu"]),
    ("UG", &["Uganda"]),
    ("UA", &["Ukraine", "Ukraina"]),
    ("AE", &["United Arab Emirates", "UAE"]),
    ("GB", &["United Kingdom", "UK", "Britain", "England", "Scotland", "Wales"]),
    ("US", &["United States of America", "United States", "USA"]),
    ("UM", &["United States Minor Outlying Islands"]),
    ("UY", &["Uruguay"]),
    ("UZ", &["Uzbekistan"]),
    ("VU", &["Vanuatu"]),
    ("VE", &["Venezuela, Bolivarian Republic of", "Venezuela"]),
    ("VN", &["Viet Nam", "Vietnam"]),
    ("VG", &["Virgin Islands, British"]),
    ("VI", &["Virgin Islands, U.S."]),
    ("WF", &["Wallis and Futuna"]),
    ("EH", &["Western Sahara"]),
    ("YE", &["Yemen"]),
    ("ZM", &["Zambia"]),
    ("ZW", &["Zimbabwe"]),
];

/// Look up the ISO 3166-1 alpha-2 code for a country name.
///
/// Returns `None` for empty input and for names that are not in the table.
#[must_use]
pub fn alpha2_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let needle = name.to_lowercase();
    COUNTRIES
        .iter()
        .find(|(_, names)| names.iter().any(|n| n.to_lowercase() == needle))
        .map(|(code, _)| *code)
}
