//! Built-in quotes used to seed the quote table.

use crate::models::{QuoteCategory, QuoteRecord};

/// Number of seeded quotes, one per day of the year
pub const SEED_QUOTE_COUNT: i64 = 365;

type Entry = (&'static str, Option<&'static str>);

const HOPE: &[Entry] = &[
    ("Hope is the thing with feathers that perches in the soul.", Some("Emily Dickinson")),
    ("Even the darkest night will end and the sun will rise.", Some("Victor Hugo")),
    ("We must accept finite disappointment, but never lose infinite hope.", Some("Martin Luther King Jr.")),
    ("Hope is being able to see that there is light despite all of the darkness.", Some("Desmond Tutu")),
    ("Keep your face always toward the sunshine, and shadows will fall behind you.", Some("Walt Whitman")),
    ("The sun himself is weak when he first rises, and gathers strength and courage as the day gets on.", Some("Charles Dickens")),
    ("Hope smiles from the threshold of the year to come, whispering, 'It will be happier.'", Some("Alfred Tennyson")),
    ("Once you choose hope, anything is possible.", Some("Christopher Reeve")),
    ("Every cloud has a silver lining.", None),
    ("After the rain comes the rainbow.", None),
];

const LOVE: &[Entry] = &[
    ("Where there is love there is life.", Some("Mahatma Gandhi")),
    ("Love is composed of a single soul inhabiting two bodies.", Some("Aristotle")),
    ("The best and most beautiful things in the world cannot be seen or even touched. They must be felt with the heart.", Some("Helen Keller")),
    ("Love never dies a natural death.", Some("Anaïs Nin")),
    ("To love and be loved is to feel the sun from both sides.", Some("David Viscott")),
    ("We are shaped and fashioned by what we love.", Some("Johann Wolfgang von Goethe")),
    ("Grief is the price we pay for love.", Some("Queen Elizabeth II")),
    ("Those we love don't go away, they walk beside us every day.", None),
    ("Love is the only force capable of transforming an enemy into a friend.", Some("Martin Luther King Jr.")),
    ("Grief, I've learned, is really just love with no place to go.", Some("Jamie Anderson")),
];

const REMEMBRANCE: &[Entry] = &[
    ("To live in hearts we leave behind is not to die.", Some("Thomas Campbell")),
    ("What we have once enjoyed we can never lose. All that we love deeply becomes a part of us.", Some("Helen Keller")),
    ("Unable are the loved to die, for love is immortality.", Some("Emily Dickinson")),
    ("The life of the dead is placed in the memory of the living.", Some("Marcus Tullius Cicero")),
    ("God gave us memory so that we might have roses in December.", Some("J. M. Barrie")),
    ("Death leaves a heartache no one can heal, love leaves a memory no one can steal.", None),
    ("Those we have held in our arms for a little while, we hold in our hearts forever.", None),
    ("Memory is the treasury and guardian of all things.", Some("Marcus Tullius Cicero")),
    ("Perhaps they are not stars, but rather openings in heaven where the love of our lost ones shines down upon us.", None),
    ("Nothing is ever really lost to us as long as we remember it.", Some("L. M. Montgomery")),
];

const STRENGTH: &[Entry] = &[
    ("Out of suffering have emerged the strongest souls.", Some("Kahlil Gibran")),
    ("The darker the night, the brighter the stars.", Some("Fyodor Dostoevsky")),
    ("Although the world is full of suffering, it is also full of the overcoming of it.", Some("Helen Keller")),
    ("It always seems impossible until it's done.", Some("Nelson Mandela")),
    ("You never know how strong you are until being strong is the only choice you have.", Some("Bob Marley")),
    ("Fall seven times, stand up eight.", None),
    ("What lies behind us and what lies before us are tiny matters compared to what lies within us.", Some("Ralph Waldo Emerson")),
    ("Tears shed for another person are not a sign of weakness. They are a sign of a pure heart.", Some("José N. Harris")),
    ("Courage is going on when you don't have the strength.", Some("Theodore Roosevelt")),
    ("The wound is the place where the light enters you.", Some("Rumi")),
];

fn entries(category: QuoteCategory) -> &'static [Entry] {
    match category {
        QuoteCategory::Hope => HOPE,
        QuoteCategory::Love => LOVE,
        QuoteCategory::Remembrance => REMEMBRANCE,
        QuoteCategory::Strength => STRENGTH,
    }
}

/// Seed quote for day `day_number` (1-based): categories cycle daily,
/// texts cycle within their category.
pub fn seed_quote(day_number: i64) -> QuoteRecord {
    let categories = QuoteCategory::all();
    let offset = (day_number - 1).max(0) as usize;
    let category = categories[offset % categories.len()];
    let pool = entries(category);
    let (text, author) = pool[(offset / categories.len()) % pool.len()];

    QuoteRecord::new(
        text.to_string(),
        author.map(|a| a.to_string()),
        category,
        day_number,
    )
}

/// The full seed set, day numbers 1..=365
pub fn seed_quotes() -> Vec<QuoteRecord> {
    (1..=SEED_QUOTE_COUNT).map(seed_quote).collect()
}
