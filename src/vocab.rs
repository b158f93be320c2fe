use std::collections::BTreeMap;

use crate::text::normalize;

/// Default canonical country names, as they appear in campaign titles.
const DEFAULT_PAISES: &[&str] = &[
    "Afganistán",
    "Albania",
    "Alemania",
    "Andorra",
    "Angola",
    "Antigua y Barbuda",
    "Arabia Saudí",
    "Argelia",
    "Argentina",
    "Armenia",
    "Australia",
    "Austria",
    "Azerbaiyán",
    "Bahamas",
    "Bahréin",
    "Bangladesh",
    "Barbados",
    "Bélgica",
    "Belice",
    "Benín",
    "Bután",
    "Bielorrusia",
    "Birmania",
    "Bolivia",
    "Bosnia y Herzegovina",
    "Botsuana",
    "Brasil",
    "Brunéi",
    "Bulgaria",
    "Burkina Faso",
    "Burundi",
    "Cabo Verde",
    "Camboya",
    "Camerún",
    "Canadá",
    "Catar",
    "Chad",
    "Chile",
    "China",
    "Chipre",
    "Ciudad del Vaticano",
    "Colombia",
    "Comoras",
    "Corea del Norte",
    "Corea del Sur",
    "Costa de Marfil",
    "Costa Rica",
    "Croacia",
    "Cuba",
    "Dinamarca",
    "Dominica",
    "Ecuador",
    "Egipto",
    "El Salvador",
    "Emiratos Árabes Unidos",
    "Eritrea",
    "Eslovaquia",
    "Eslovenia",
    "España",
    "Estados Unidos",
    "Estonia",
    "Etiopía",
    "Filipinas",
    "Finlandia",
    "Fiyi",
    "Francia",
    "Gabón",
    "Gambia",
    "Georgia",
    "Ghana",
    "Gibraltar",
    "Granada",
    "Grecia",
    "Guatemala",
    "Guinea",
    "Guinea Ecuatorial",
    "Guinea-Bissau",
    "Guyana",
    "Haití",
    "Honduras",
    "Hong Kong",
    "Hungría",
    "India",
    "Indonesia",
    "Irak",
    "Irán",
    "Irlanda",
    "Isla de Man",
    "Islandia",
    "Islas Marshall",
    "Islas Salomón",
    "Israel",
    "Italia",
    "Jamaica",
    "Japón",
    "Jordania",
    "Kazajistán",
    "Kenia",
    "Kirguistán",
    "Kiribati",
    "Kosovo",
    "Kuwait",
    "Laos",
    "Lesoto",
    "Letonia",
    "Líbano",
    "Liberia",
    "Libia",
    "Liechtenstein",
    "Lituania",
    "Luxemburgo",
    "Macedonia del Norte",
    "Madagascar",
    "Malasia",
    "Malaui",
    "Maldivas",
    "Malí",
    "Malta",
    "Marruecos",
    "Mauricio",
    "Mauritania",
    "México",
    "Micronesia",
    "Moldavia",
    "Mónaco",
    "Mongolia",
    "Montenegro",
    "Mozambique",
    "Namibia",
    "Nauru",
    "Nepal",
    "Nicaragua",
    "Níger",
    "Nigeria",
    "Noruega",
    "Nueva Zelanda",
    "Omán",
    "Países Bajos",
    "Pakistán",
    "Palaos",
    "Palestina",
    "Panamá",
    "Papúa Nueva Guinea",
    "Paraguay",
    "Perú",
    "Polonia",
    "Portugal",
    "Puerto Rico",
    "Reino Unido",
    "República Centroafricana",
    "República Checa",
    "República del Congo",
    "República Democrática del Congo",
    "República Dominicana",
    "Ruanda",
    "Rumania",
    "Rusia",
    "Samoa",
    "San Cristóbal y Nieves",
    "San Marino",
    "San Vicente y las Granadinas",
    "Santa Lucía",
    "Santo Tomé y Príncipe",
    "Senegal",
    "Serbia",
    "Seychelles",
    "Sierra Leona",
    "Singapur",
    "Siria",
    "Somalia",
    "Sri Lanka",
    "Suazilandia",
    "Sudáfrica",
    "Sudán",
    "Sudán del Sur",
    "Suecia",
    "Suiza",
    "Surinam",
    "Tailandia",
    "Taiwán",
    "Tanzania",
    "Tayikistán",
    "Timor Oriental",
    "Togo",
    "Tonga",
    "Trinidad y Tobago",
    "Túnez",
    "Turkmenistán",
    "Turquía",
    "Tuvalu",
    "Ucrania",
    "Uganda",
    "Uruguay",
    "Uzbekistán",
    "Vanuatu",
    "Venezuela",
    "Vietnam",
    "Yemen",
    "Yibuti",
    "Zambia",
    "Zimbabue",
];

/// Default canonical faculty names.
const DEFAULT_FACULTADES: &[&str] = &[
    "Ciencias del Deporte",
    "Derecho",
    "Diseño",
    "Educación",
    "Enfermería",
    "Escuela de Idiomas",
    "Escuela de Negocios",
    "Farmacia",
    "Fisioterapia",
    "Humanidades",
    "Informática",
    "Ingeniería",
    "Inteligencia Artificial",
    "Medicina",
    "Nutrición",
    "Odontología",
    "Periodismo y Comunicación",
    "Psicología",
    "Veterinaria",
    "Videojuegos",
];

/// Countries whose campaign titles use more than one spelling. Each variant
/// list includes the canonical spelling itself; when an alias set is
/// registered it replaces the canonical name both when building classifier
/// candidates and when expanding a user selection.
fn default_alias() -> BTreeMap<String, Vec<String>> {
    let mut alias = BTreeMap::new();
    alias.insert(
        "Estados Unidos".to_string(),
        vec![
            "Estados Unidos".to_string(),
            "Estados Unidos de América".to_string(),
        ],
    );
    alias.insert(
        "Catar".to_string(),
        vec!["Catar".to_string(), "Qatar".to_string()],
    );
    alias.insert(
        "Arabia Saudí".to_string(),
        vec!["Arabia Saudí".to_string(), "Arabia Saudita".to_string()],
    );
    alias.insert(
        "República Democrática del Congo".to_string(),
        vec![
            "República Democrática del Congo".to_string(),
            "R.D. del Congo".to_string(),
        ],
    );
    alias
}

/// A classifier candidate: the text variant to search for and the canonical
/// country it resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryCandidate {
    pub text: String,
    pub canonical: String,
}

/// The static reference vocabulary. Built once, immutable afterwards.
///
/// Both name lists are kept sorted by their normalized form so that listing
/// output and positional tie-breaks are deterministic regardless of how the
/// configuration file ordered them.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    paises: Vec<String>,
    facultades: Vec<String>,
    alias: BTreeMap<String, Vec<String>>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_PAISES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_FACULTADES.iter().map(|s| s.to_string()).collect(),
            default_alias(),
        )
    }
}

impl Vocabulary {
    pub fn new(
        mut paises: Vec<String>,
        mut facultades: Vec<String>,
        alias: BTreeMap<String, Vec<String>>,
    ) -> Self {
        paises.sort_by_key(|p| normalize(p));
        paises.dedup();
        facultades.sort_by_key(|f| normalize(f));
        facultades.dedup();

        Self {
            paises,
            facultades,
            alias,
        }
    }

    pub fn paises(&self) -> &[String] {
        &self.paises
    }

    pub fn facultades(&self) -> &[String] {
        &self.facultades
    }

    pub fn alias(&self) -> &BTreeMap<String, Vec<String>> {
        &self.alias
    }

    /// Textual variants standing in for a canonical country: its alias list
    /// when one is registered, otherwise the canonical name alone.
    pub fn expand_pais<'a>(&'a self, canonical: &'a str) -> Vec<&'a str> {
        match self.alias.get(canonical) {
            Some(variants) => variants.iter().map(String::as_str).collect(),
            None => vec![canonical],
        }
    }

    /// All classifier candidates, longest text first. Longer names must be
    /// tested before shorter names that are substrings of them ("República
    /// Dominicana" before "Dominica"); the sort is stable, so equal lengths
    /// keep canonical order.
    pub fn country_candidates(&self) -> Vec<CountryCandidate> {
        let mut candidates: Vec<CountryCandidate> = Vec::new();
        for pais in &self.paises {
            for variant in self.expand_pais(pais) {
                candidates.push(CountryCandidate {
                    text: variant.to_string(),
                    canonical: pais.clone(),
                });
            }
        }
        candidates.sort_by_key(|c| std::cmp::Reverse(c.text.chars().count()));
        candidates
    }

    /// Resolve a user-supplied country name to its canonical spelling,
    /// accent- and case-insensitively.
    pub fn resolve_pais(&self, name: &str) -> Option<&str> {
        let wanted = normalize(name);
        self.paises
            .iter()
            .find(|p| normalize(p) == wanted)
            .map(String::as_str)
    }

    /// Resolve a user-supplied faculty name to its canonical spelling.
    pub fn resolve_facultad(&self, name: &str) -> Option<&str> {
        let wanted = normalize(name);
        self.facultades
            .iter()
            .find(|f| normalize(f) == wanted)
            .map(String::as_str)
    }
}
