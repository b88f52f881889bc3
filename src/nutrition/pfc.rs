use serde::{Deserialize, Serialize};

/// The three tracked macronutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroKind {
    Protein,
    Fat,
    Carbohydrate,
}

impl MacroKind {
    pub const ALL: [MacroKind; 3] = [MacroKind::Protein, MacroKind::Fat, MacroKind::Carbohydrate];

    /// Atwater energy density.
    pub fn kcal_per_gram(self) -> f32 {
        match self {
            MacroKind::Protein => 4.0,
            MacroKind::Fat => 9.0,
            MacroKind::Carbohydrate => 4.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MacroKind::Protein => "Protein",
            MacroKind::Fat => "Fat",
            MacroKind::Carbohydrate => "Carbohydrate",
        }
    }
}

pub fn macro_grams_to_kcal(grams: f32, kind: MacroKind) -> f32 {
    grams * kind.kcal_per_gram()
}

/// Grams of one macronutrient and the energy they carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroAmount {
    pub grams: f32,
    pub kcal: f32,
}

impl MacroAmount {
    pub fn from_grams(grams: f32, kind: MacroKind) -> Self {
        MacroAmount {
            grams,
            kcal: macro_grams_to_kcal(grams, kind),
        }
    }
}

impl std::ops::AddAssign for MacroAmount {
    fn add_assign(&mut self, other: Self) {
        self.grams += other.grams;
        self.kcal += other.kcal;
    }
}

/// Share of macro calories per macronutrient, each in 0.0..=1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PfcRatio {
    pub protein: f32,
    pub fat: f32,
    pub carbohydrate: f32,
}

impl PfcRatio {
    pub fn from_kcal(protein: f32, fat: f32, carbohydrate: f32) -> Self {
        let total = protein + fat + carbohydrate;
        if total <= 0.0 {
            return PfcRatio::default();
        }
        PfcRatio {
            protein: protein / total,
            fat: fat / total,
            carbohydrate: carbohydrate / total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_grams_to_kcal() {
        assert_eq!(macro_grams_to_kcal(10.0, MacroKind::Protein), 40.0);
        assert_eq!(macro_grams_to_kcal(10.0, MacroKind::Fat), 90.0);
        assert_eq!(macro_grams_to_kcal(10.0, MacroKind::Carbohydrate), 40.0);
        assert_eq!(macro_grams_to_kcal(0.0, MacroKind::Fat), 0.0);
    }

    #[test]
    fn test_pfc_ratio() {
        let ratio = PfcRatio::from_kcal(40.0, 90.0, 70.0);
        assert!((ratio.protein - 0.2).abs() < 1e-6);
        assert!((ratio.fat - 0.45).abs() < 1e-6);
        assert!((ratio.carbohydrate - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_pfc_ratio_all_zero() {
        assert_eq!(PfcRatio::from_kcal(0.0, 0.0, 0.0), PfcRatio::default());
    }
}
