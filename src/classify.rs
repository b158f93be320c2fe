use crate::text::normalize;
use crate::vocab::{CountryCandidate, Vocabulary};

/// Labels read out of one campaign name. Either side may be absent; the
/// loader keeps a record only when both resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub pais: Option<String>,
    pub facultad: Option<String>,
}

/// Resolves the country and faculty embedded in campaign titles.
///
/// Candidates are precomputed from the vocabulary once (with their
/// normalized forms), since every row of every load runs through here.
pub struct CampaignClassifier {
    countries: Vec<NormalizedCandidate>,
    faculties: Vec<NormalizedFaculty>,
}

struct NormalizedCandidate {
    normalized: String,
    canonical: String,
}

struct NormalizedFaculty {
    normalized: String,
    canonical: String,
}

impl CampaignClassifier {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let countries = vocabulary
            .country_candidates()
            .into_iter()
            .map(|CountryCandidate { text, canonical }| NormalizedCandidate {
                normalized: normalize(&text),
                canonical,
            })
            .collect();

        let faculties = vocabulary
            .facultades()
            .iter()
            .map(|f| NormalizedFaculty {
                normalized: normalize(f),
                canonical: f.clone(),
            })
            .collect();

        Self {
            countries,
            faculties,
        }
    }

    /// Classify one campaign name. Pure: the result depends only on the
    /// text and the vocabulary this classifier was built from.
    pub fn classify(&self, nombre: &str) -> Classification {
        let texto = normalize(nombre);

        Classification {
            pais: self.find_pais(&texto),
            facultad: self.find_facultad(&texto),
        }
    }

    /// First candidate (longest names first) occurring anywhere in the
    /// normalized title wins; aliases report their canonical country.
    fn find_pais(&self, texto: &str) -> Option<String> {
        self.countries
            .iter()
            .find(|c| texto.contains(&c.normalized))
            .map(|c| c.canonical.clone())
    }

    /// The faculty with the leftmost occurrence wins. Strict `<` keeps the
    /// earlier faculty in canonical order when two match at the same
    /// position.
    fn find_facultad(&self, texto: &str) -> Option<String> {
        let mut mejor: Option<&NormalizedFaculty> = None;
        let mut mejor_pos = texto.len();

        for facultad in &self.faculties {
            if let Some(pos) = texto.find(&facultad.normalized) {
                if pos < mejor_pos {
                    mejor = Some(facultad);
                    mejor_pos = pos;
                }
            }
        }

        mejor.map(|f| f.canonical.clone())
    }
}
