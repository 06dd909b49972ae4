use classifier::{Fruit, Ripeness};

/// Static browse-page content for one fruit.
#[derive(Debug)]
pub struct FruitInfo {
    pub fruit: Fruit,
    pub emoji: &'static str,
    /// Example image file name, relative to the gallery directory.
    pub image_file: &'static str,
    /// One description per ripeness state, freshest first.
    pub descriptions: [(Ripeness, &'static str); 3],
}

static CATALOG: [FruitInfo; 5] = [
    FruitInfo {
        fruit: Fruit::Apel,
        emoji: "🍎",
        image_file: "apel_segar_1.jpg",
        descriptions: [
            (Ripeness::Segar, "Kulit mengkilap, warna cerah, tidak ada bercak busuk."),
            (
                Ripeness::SetengahSegar,
                "Warna sedikit pudar, mulai ada sedikit bercak atau kerutan.",
            ),
            (
                Ripeness::Busuk,
                "Banyak bercak hitam/coklat, tekstur lembek, berbau tidak sedap.",
            ),
        ],
    },
    FruitInfo {
        fruit: Fruit::Jeruk,
        emoji: "🍊",
        image_file: "jeruk_segar_2.jpg",
        descriptions: [
            (Ripeness::Segar, "Kulit cerah, mulus, tidak ada kerutan."),
            (
                Ripeness::SetengahSegar,
                "Kulit mulai keriput, sedikit lunak di beberapa bagian.",
            ),
            (Ripeness::Busuk, "Kulit sangat keriput, berjamur atau bau asam tajam."),
        ],
    },
    FruitInfo {
        fruit: Fruit::Melon,
        emoji: "🍈",
        image_file: "melon_segar_3.jpg",
        descriptions: [
            (Ripeness::Segar, "Kulit keras, warna sesuai jenis, aroma segar."),
            (Ripeness::SetengahSegar, "Mulai ada bercak gelap, aroma agak tajam."),
            (Ripeness::Busuk, "Banyak bercak busuk, kulit lembek, aroma menyengat."),
        ],
    },
    FruitInfo {
        fruit: Fruit::Pisang,
        emoji: "🍌",
        image_file: "pisang_segar_4.jpg",
        descriptions: [
            (Ripeness::Segar, "Kulit kuning cerah, tidak ada bercak hitam berlebihan."),
            (Ripeness::SetengahSegar, "Mulai muncul bercak coklat kecil."),
            (Ripeness::Busuk, "Kulit hitam hampir seluruhnya, tekstur sangat lembek."),
        ],
    },
    FruitInfo {
        fruit: Fruit::Tomat,
        emoji: "🍅",
        image_file: "tomat_segar_5.jpg",
        descriptions: [
            (Ripeness::Segar, "Warna merah cerah, kulit mulus, keras saat ditekan."),
            (Ripeness::SetengahSegar, "Kulit sedikit keriput, mulai lembek."),
            (Ripeness::Busuk, "Bercak hitam, kulit pecah, berair dan berbau."),
        ],
    },
];

pub fn all() -> &'static [FruitInfo] {
    &CATALOG
}

pub fn info(fruit: Fruit) -> &'static FruitInfo {
    match fruit {
        Fruit::Apel => &CATALOG[0],
        Fruit::Jeruk => &CATALOG[1],
        Fruit::Melon => &CATALOG[2],
        Fruit::Pisang => &CATALOG[3],
        Fruit::Tomat => &CATALOG[4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_fruit_once_in_display_order() {
        let fruits: Vec<Fruit> = all().iter().map(|info| info.fruit).collect();
        assert_eq!(fruits, Fruit::ALL.to_vec());

        for fruit in Fruit::ALL {
            assert_eq!(info(fruit).fruit, fruit);
        }
    }

    #[test]
    fn test_every_fruit_describes_all_ripeness_states_in_order() {
        for entry in all() {
            let states: Vec<Ripeness> = entry.descriptions.iter().map(|(r, _)| *r).collect();
            assert_eq!(states, Ripeness::ALL.to_vec(), "{}", entry.fruit);
            assert!(entry.descriptions.iter().all(|(_, text)| !text.is_empty()));
        }
    }

    #[test]
    fn test_example_images_are_named_after_their_fruit() {
        for entry in all() {
            assert!(entry.image_file.starts_with(entry.fruit.slug()));
            assert!(entry.image_file.ends_with(".jpg"));
        }
    }
}
