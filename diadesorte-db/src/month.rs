/// Mois de la sorte tels que la Caixa les publie (noms portugais).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuckyMonth {
    Janeiro,
    Fevereiro,
    Marco,
    Abril,
    Maio,
    Junho,
    Julho,
    Agosto,
    Setembro,
    Outubro,
    Novembro,
    Dezembro,
}

impl LuckyMonth {
    pub const ALL: [LuckyMonth; 12] = [
        LuckyMonth::Janeiro,
        LuckyMonth::Fevereiro,
        LuckyMonth::Marco,
        LuckyMonth::Abril,
        LuckyMonth::Maio,
        LuckyMonth::Junho,
        LuckyMonth::Julho,
        LuckyMonth::Agosto,
        LuckyMonth::Setembro,
        LuckyMonth::Outubro,
        LuckyMonth::Novembro,
        LuckyMonth::Dezembro,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LuckyMonth::Janeiro => "Janeiro",
            LuckyMonth::Fevereiro => "Fevereiro",
            LuckyMonth::Marco => "Março",
            LuckyMonth::Abril => "Abril",
            LuckyMonth::Maio => "Maio",
            LuckyMonth::Junho => "Junho",
            LuckyMonth::Julho => "Julho",
            LuckyMonth::Agosto => "Agosto",
            LuckyMonth::Setembro => "Setembro",
            LuckyMonth::Outubro => "Outubro",
            LuckyMonth::Novembro => "Novembro",
            LuckyMonth::Dezembro => "Dezembro",
        }
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            LuckyMonth::Janeiro => "Jan",
            LuckyMonth::Fevereiro => "Fev",
            LuckyMonth::Marco => "Mar",
            LuckyMonth::Abril => "Abr",
            LuckyMonth::Maio => "Mai",
            LuckyMonth::Junho => "Jun",
            LuckyMonth::Julho => "Jul",
            LuckyMonth::Agosto => "Ago",
            LuckyMonth::Setembro => "Set",
            LuckyMonth::Outubro => "Out",
            LuckyMonth::Novembro => "Nov",
            LuckyMonth::Dezembro => "Dez",
        }
    }

    pub fn index(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_index(index: u32) -> Option<LuckyMonth> {
        match index {
            1..=12 => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    /// Formes textuelles connues (minuscules) : nom complet, variante sans
    /// accent, abréviation à trois lettres.
    fn text_forms(self) -> &'static [&'static str] {
        match self {
            LuckyMonth::Janeiro => &["janeiro", "jan"],
            LuckyMonth::Fevereiro => &["fevereiro", "fev"],
            LuckyMonth::Marco => &["março", "marco", "mar"],
            LuckyMonth::Abril => &["abril", "abr"],
            LuckyMonth::Maio => &["maio", "mai"],
            LuckyMonth::Junho => &["junho", "jun"],
            LuckyMonth::Julho => &["julho", "jul"],
            LuckyMonth::Agosto => &["agosto", "ago"],
            LuckyMonth::Setembro => &["setembro", "set"],
            LuckyMonth::Outubro => &["outubro", "out"],
            LuckyMonth::Novembro => &["novembro", "nov"],
            LuckyMonth::Dezembro => &["dezembro", "dez"],
        }
    }

    /// Normalise une forme textuelle quelconque : numéral (avec ou sans zéro
    /// initial), abréviation, nom complet, variante sans accent, puis
    /// recherche par inclusion et enfin premier numéral 1-12 incorporé.
    pub fn parse(input: &str) -> Option<LuckyMonth> {
        let cleaned = input.trim().to_lowercase();
        if cleaned.is_empty() {
            return None;
        }

        if let Some(month) = cleaned.parse::<u32>().ok().and_then(Self::from_index) {
            return Some(month);
        }

        for month in Self::ALL {
            if month.text_forms().iter().any(|form| *form == cleaned) {
                return Some(month);
            }
        }

        for month in Self::ALL {
            if month
                .text_forms()
                .iter()
                .any(|form| cleaned.contains(form) || form.contains(cleaned.as_str()))
            {
                return Some(month);
            }
        }

        let embedded: String = cleaned
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        embedded.parse::<u32>().ok().and_then(Self::from_index)
    }
}

impl std::fmt::Display for LuckyMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Champ « mois de la sorte » tel que stocké : soit un mois reconnu, soit le
/// texte d'origine conservé pour diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum MonthLabel {
    Recognized(LuckyMonth),
    Unknown(String),
}

impl MonthLabel {
    pub fn parse(input: &str) -> MonthLabel {
        match LuckyMonth::parse(input) {
            Some(month) => MonthLabel::Recognized(month),
            None => MonthLabel::Unknown(input.trim().to_string()),
        }
    }

    pub fn month(&self) -> Option<LuckyMonth> {
        match self {
            MonthLabel::Recognized(month) => Some(*month),
            MonthLabel::Unknown(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MonthLabel::Recognized(month) => month.name(),
            MonthLabel::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numerals() {
        assert_eq!(LuckyMonth::parse("1"), Some(LuckyMonth::Janeiro));
        assert_eq!(LuckyMonth::parse("01"), Some(LuckyMonth::Janeiro));
        assert_eq!(LuckyMonth::parse("12"), Some(LuckyMonth::Dezembro));
        assert_eq!(LuckyMonth::parse("13"), None);
        assert_eq!(LuckyMonth::parse("0"), None);
    }

    #[test]
    fn test_parse_abbreviations_any_case() {
        assert_eq!(LuckyMonth::parse("jan"), Some(LuckyMonth::Janeiro));
        assert_eq!(LuckyMonth::parse("FEV"), Some(LuckyMonth::Fevereiro));
        assert_eq!(LuckyMonth::parse("Dez"), Some(LuckyMonth::Dezembro));
    }

    #[test]
    fn test_parse_full_names_any_case() {
        assert_eq!(LuckyMonth::parse("Janeiro"), Some(LuckyMonth::Janeiro));
        assert_eq!(LuckyMonth::parse("SETEMBRO"), Some(LuckyMonth::Setembro));
        assert_eq!(LuckyMonth::parse("outubro"), Some(LuckyMonth::Outubro));
    }

    #[test]
    fn test_parse_unaccented_marco() {
        assert_eq!(LuckyMonth::parse("Março"), Some(LuckyMonth::Marco));
        assert_eq!(LuckyMonth::parse("Marco"), Some(LuckyMonth::Marco));
        assert_eq!(LuckyMonth::parse("MARCO"), Some(LuckyMonth::Marco));
    }

    #[test]
    fn test_parse_substring() {
        assert_eq!(
            LuckyMonth::parse("Janeiro de 2024"),
            Some(LuckyMonth::Janeiro)
        );
    }

    #[test]
    fn test_parse_embedded_numeral() {
        assert_eq!(LuckyMonth::parse("mes 7"), Some(LuckyMonth::Julho));
        assert_eq!(LuckyMonth::parse("mes 99"), None);
    }

    #[test]
    fn test_parse_idempotent_on_canonical() {
        for month in LuckyMonth::ALL {
            assert_eq!(LuckyMonth::parse(month.name()), Some(month));
            assert_eq!(LuckyMonth::parse(month.abbrev()), Some(month));
            assert_eq!(
                LuckyMonth::parse(&month.index().to_string()),
                Some(month)
            );
        }
    }

    #[test]
    fn test_label_keeps_unknown_text() {
        let label = MonthLabel::parse("xyzxyz");
        assert_eq!(label, MonthLabel::Unknown("xyzxyz".to_string()));
        assert_eq!(label.label(), "xyzxyz");
        assert_eq!(label.month(), None);
    }

    #[test]
    fn test_label_recognized_displays_canonical() {
        let label = MonthLabel::parse("mar");
        assert_eq!(label.label(), "Março");
        assert_eq!(label.month(), Some(LuckyMonth::Marco));
    }
}
