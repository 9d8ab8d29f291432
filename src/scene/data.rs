// data.rs - Built-in placeholder gallery
//
// Shown when a page mounts the gallery without any items.

pub const DEFAULT_ITEMS: [(&str, &str); 12] = [
    ("https://picsum.photos/seed/1/800/600?grayscale", "Bridge"),
    ("https://picsum.photos/seed/2/800/600?grayscale", "Desk Setup"),
    ("https://picsum.photos/seed/3/800/600?grayscale", "Waterfall"),
    ("https://picsum.photos/seed/4/800/600?grayscale", "Strawberries"),
    ("https://picsum.photos/seed/5/800/600?grayscale", "Deep Diving"),
    ("https://picsum.photos/seed/16/800/600?grayscale", "Train Track"),
    ("https://picsum.photos/seed/17/800/600?grayscale", "Santorini"),
    ("https://picsum.photos/seed/8/800/600?grayscale", "Blurry Lights"),
    ("https://picsum.photos/seed/9/800/600?grayscale", "New York"),
    ("https://picsum.photos/seed/10/800/600?grayscale", "Good Boy"),
    ("https://picsum.photos/seed/21/800/600?grayscale", "Coastline"),
    ("https://picsum.photos/seed/12/800/600?grayscale", "Palm Trees"),
];
