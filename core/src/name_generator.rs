//! Deterministic client and agent name generation from curated lists.
//!
//! Same random stream in, same names out.

use crate::{model::Gender, rng::RandomSource};

pub struct NameGenerator;

impl NameGenerator {
    /// First + last name, with the first name drawn from the list
    /// matching `gender`.
    pub fn full_name<R: RandomSource>(gender: Gender, rng: &mut R) -> String {
        let first = Self::first_name(gender, rng);
        let last = Self::last_name(rng);
        format!("{first} {last}")
    }

    pub fn first_name<R: RandomSource>(gender: Gender, rng: &mut R) -> &'static str {
        match gender {
            Gender::Male => *rng.pick(Self::male_first_names()),
            Gender::Female => *rng.pick(Self::female_first_names()),
        }
    }

    pub fn last_name<R: RandomSource>(rng: &mut R) -> &'static str {
        *rng.pick(Self::last_names())
    }

    fn male_first_names() -> &'static [&'static str] {
        &[
            "James", "John", "Peter", "David", "Daniel", "Joseph", "Samuel", "Michael",
            "Brian", "Kevin", "Dennis", "Collins", "Victor", "Moses", "George", "Paul",
            "Stephen", "Charles", "Patrick", "Francis", "Anthony", "Emmanuel", "Eric",
            "Kennedy", "Felix", "Martin", "Simon", "Isaac", "Joshua", "Benjamin",
            "Kamau", "Otieno", "Mwangi", "Kiprono", "Wafula", "Omondi", "Njoroge",
            "Kipchoge", "Onyango", "Mutua", "Barasa", "Kibet", "Kariuki", "Ochieng",
            "Cheruiyot", "Macharia", "Odhiambo", "Kimani", "Musyoka", "Rotich",
        ]
    }

    fn female_first_names() -> &'static [&'static str] {
        &[
            "Mary", "Grace", "Faith", "Mercy", "Joyce", "Esther", "Ruth", "Sarah",
            "Elizabeth", "Jane", "Anne", "Margaret", "Lucy", "Catherine", "Nancy",
            "Caroline", "Winnie", "Beatrice", "Alice", "Janet", "Rose", "Susan",
            "Agnes", "Purity", "Gladys", "Irene", "Diana", "Sharon", "Christine", "Ivy",
            "Wanjiru", "Akinyi", "Njeri", "Chebet", "Atieno", "Wambui", "Nyambura",
            "Jepkosgei", "Awino", "Mumbua", "Nafula", "Jeruto", "Wairimu", "Adhiambo",
            "Kemunto", "Moraa", "Nekesa", "Wangari", "Mwikali", "Chepkemoi",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Kamau", "Otieno", "Mwangi", "Kiprono", "Wafula", "Omondi", "Njoroge",
            "Onyango", "Mutua", "Barasa", "Kibet", "Kariuki", "Ochieng", "Cheruiyot",
            "Macharia", "Odhiambo", "Kimani", "Musyoka", "Rotich", "Wanjala", "Koech",
            "Githinji", "Nyaga", "Mugo", "Maina", "Kiplagat", "Langat", "Owino",
            "Okello", "Juma", "Ndungu", "Gitau", "Wekesa", "Simiyu", "Karanja",
            "Wambua", "Muriuki", "Kirui", "Chege", "Ouma", "Smith", "Patel", "Shah",
            "Johnson", "Brown", "Williams", "Taylor", "Anderson", "Thompson", "Wilson",
        ]
    }
}
