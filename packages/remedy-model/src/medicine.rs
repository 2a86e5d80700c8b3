use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
pub struct MedicineRow {
	pub disease: String,
	pub conventional_medicine: String,
	pub conventional_rating: f64,
	pub alternative_medicine: String,
	pub alternative_rating: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
	Pharmaceutical,
	Alternative,
}
impl Preference {
	/// `"pharmaceutical"` (any case) selects conventional medicine; everything else is treated
	/// as a preference for alternatives.
	pub fn parse(value: &str) -> Self {
		if value.trim().eq_ignore_ascii_case("pharmaceutical") {
			Self::Pharmaceutical
		} else {
			Self::Alternative
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
	pub medicine: String,
	pub rating: f64,
}

/// Static reference table of medicines per disease.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "Vec<MedicineRow>")]
pub struct MedicineTable {
	by_disease: HashMap<String, Vec<MedicineRow>>,
}
impl MedicineTable {
	pub fn new(rows: Vec<MedicineRow>) -> Self {
		let mut by_disease: HashMap<String, Vec<MedicineRow>> = HashMap::new();

		for row in rows {
			by_disease.entry(row.disease.clone()).or_default().push(row);
		}

		Self { by_disease }
	}

	pub fn disease_count(&self) -> usize {
		self.by_disease.len()
	}

	/// Rows for `disease` in table order, projected onto the preferred column pair.
	///
	/// `None` means the disease has no rows at all, which callers must keep distinct from an
	/// empty recommendation list.
	pub fn lookup(&self, disease: &str, preference: Preference) -> Option<Vec<Recommendation>> {
		let rows = self.by_disease.get(disease)?;
		let recommendations = rows
			.iter()
			.map(|row| match preference {
				Preference::Pharmaceutical => Recommendation {
					medicine: row.conventional_medicine.clone(),
					rating: row.conventional_rating,
				},
				Preference::Alternative => Recommendation {
					medicine: row.alternative_medicine.clone(),
					rating: row.alternative_rating,
				},
			})
			.collect();

		Some(recommendations)
	}
}
impl From<Vec<MedicineRow>> for MedicineTable {
	fn from(rows: Vec<MedicineRow>) -> Self {
		Self::new(rows)
	}
}
