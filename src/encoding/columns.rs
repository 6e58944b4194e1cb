//! Feature column layout
//!
//! The classifier consumes a positional vector, so the column order here is
//! load-bearing: it must match the training columns exactly. Every list is an
//! ordered array, never a map.

/// Number of scalar (copied-through) columns
pub const SCALAR_COUNT: usize = 5;

/// Known Area values, in training column order
pub const AREAS: [&str; 36] = [
    "Adabor",
    "Badda",
    "Banasree",
    "Bangshal",
    "Biman Bandar",
    "Bosila",
    "Cantonment",
    "Chawkbazar",
    "Demra",
    "Dhanmondi",
    "Gendaria",
    "Gulshan",
    "Hazaribagh",
    "Jatrabari",
    "Kadamtali",
    "Kafrul",
    "Kalabagan",
    "Kamrangirchar",
    "Keraniganj",
    "Khilgaon",
    "Khilkhet",
    "Lalbagh",
    "Mirpur",
    "Mohammadpur",
    "Motijheel",
    "New Market",
    "Pallabi",
    "Paltan",
    "Ramna",
    "Rampura",
    "Sabujbagh",
    "Shahbagh",
    "Sher-e-Bangla Nagar",
    "Shyampur",
    "Sutrapur",
    "Tejgaon",
];

/// Known AreaType values
pub const AREA_TYPES: [&str; 2] = ["Developed", "Undeveloped"];

/// Modeled District values (only Dhaka was present in training)
pub const DISTRICTS: [&str; 1] = ["Dhaka"];

/// Known HouseType values
pub const HOUSE_TYPES: [&str; 3] = ["Building", "Other", "Tinshed"];

/// Total feature width
pub const FEATURE_COUNT: usize =
    SCALAR_COUNT + AREAS.len() + AREA_TYPES.len() + DISTRICTS.len() + HOUSE_TYPES.len();

/// Column offsets of each one-hot group
pub const AREA_OFFSET: usize = SCALAR_COUNT;
pub const AREA_TYPE_OFFSET: usize = AREA_OFFSET + AREAS.len();
pub const DISTRICT_OFFSET: usize = AREA_TYPE_OFFSET + AREA_TYPES.len();
pub const HOUSE_TYPE_OFFSET: usize = DISTRICT_OFFSET + DISTRICTS.len();

/// Full column list in the exact order the classifier was trained with
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Gender",
    "Age",
    "NS1",
    "IgG",
    "IgM",
    "Area_Adabor",
    "Area_Badda",
    "Area_Banasree",
    "Area_Bangshal",
    "Area_Biman Bandar",
    "Area_Bosila",
    "Area_Cantonment",
    "Area_Chawkbazar",
    "Area_Demra",
    "Area_Dhanmondi",
    "Area_Gendaria",
    "Area_Gulshan",
    "Area_Hazaribagh",
    "Area_Jatrabari",
    "Area_Kadamtali",
    "Area_Kafrul",
    "Area_Kalabagan",
    "Area_Kamrangirchar",
    "Area_Keraniganj",
    "Area_Khilgaon",
    "Area_Khilkhet",
    "Area_Lalbagh",
    "Area_Mirpur",
    "Area_Mohammadpur",
    "Area_Motijheel",
    "Area_New Market",
    "Area_Pallabi",
    "Area_Paltan",
    "Area_Ramna",
    "Area_Rampura",
    "Area_Sabujbagh",
    "Area_Shahbagh",
    "Area_Sher-e-Bangla Nagar",
    "Area_Shyampur",
    "Area_Sutrapur",
    "Area_Tejgaon",
    "AreaType_Developed",
    "AreaType_Undeveloped",
    "District_Dhaka",
    "HouseType_Building",
    "HouseType_Other",
    "HouseType_Tinshed",
];

/// A one-hot indicator group: attribute name, known values, first column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalGroup {
    pub attribute: &'static str,
    pub values: &'static [&'static str],
    pub offset: usize,
}

impl CategoricalGroup {
    /// Column range covered by this group
    pub fn columns(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.values.len()
    }

    /// Position of `value` within the group (exact, case-sensitive)
    pub fn position(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|known| *known == value)
    }
}

/// All categorical groups, in column order
pub const CATEGORICAL_GROUPS: [CategoricalGroup; 4] = [
    CategoricalGroup { attribute: "Area", values: &AREAS, offset: AREA_OFFSET },
    CategoricalGroup { attribute: "AreaType", values: &AREA_TYPES, offset: AREA_TYPE_OFFSET },
    CategoricalGroup { attribute: "District", values: &DISTRICTS, offset: DISTRICT_OFFSET },
    CategoricalGroup { attribute: "HouseType", values: &HOUSE_TYPES, offset: HOUSE_TYPE_OFFSET },
];

/// Index of a named column
pub fn column_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|column| *column == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 47);
        assert_eq!(FEATURE_COLUMNS.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_columns_agree_with_groups() {
        // Rebuild the column list from the groups and compare position by position
        let mut rebuilt: Vec<String> = FEATURE_COLUMNS[..SCALAR_COUNT]
            .iter()
            .map(|c| c.to_string())
            .collect();
        for group in CATEGORICAL_GROUPS {
            assert_eq!(group.offset, rebuilt.len(), "{} offset", group.attribute);
            for value in group.values {
                rebuilt.push(format!("{}_{}", group.attribute, value));
            }
        }
        assert_eq!(rebuilt, FEATURE_COLUMNS.to_vec());
    }

    #[test]
    fn test_scalar_prefix_order() {
        assert_eq!(&FEATURE_COLUMNS[..SCALAR_COUNT], &["Gender", "Age", "NS1", "IgG", "IgM"]);
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("Gender"), Some(0));
        assert_eq!(column_index("Area_Adabor"), Some(5));
        assert_eq!(column_index("District_Dhaka"), Some(43));
        assert_eq!(column_index("HouseType_Tinshed"), Some(46));
        assert_eq!(column_index("Area_Agrabad"), None);
    }

    #[test]
    fn test_group_position_is_case_sensitive() {
        let house = CATEGORICAL_GROUPS[3];
        assert_eq!(house.position("Building"), Some(0));
        assert_eq!(house.position("building"), None);
        assert_eq!(house.columns(), 44..47);
    }
}
