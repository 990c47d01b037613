//! The 78-card tarot deck and a three-card draw

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Pentacles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arcana {
    Major,
    Minor(Suit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TarotCard {
    pub id: u8,
    pub name: &'static str,
    pub arcana: Arcana,
    pub upright: &'static str,
    pub reversed: &'static str,
}

impl TarotCard {
    const fn new(
        id: u8,
        name: &'static str,
        arcana: Arcana,
        upright: &'static str,
        reversed: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            arcana,
            upright,
            reversed,
        }
    }
}

pub const DECK_SIZE: usize = 78;

pub static DECK: [TarotCard; DECK_SIZE] = [
    TarotCard::new(
        0,
        "The Fool",
        Arcana::Major,
        "New beginnings, innocence, spontaneity, free spirit",
        "Recklessness, taken advantage of, inconsideration",
    ),
    TarotCard::new(
        1,
        "The Magician",
        Arcana::Major,
        "Manifestation, resourcefulness, power, inspired action",
        "Manipulation, poor planning, untapped talents",
    ),
    TarotCard::new(
        2,
        "The High Priestess",
        Arcana::Major,
        "Intuition, sacred knowledge, divine feminine, subconscious",
        "Secrets, disconnected from intuition, withdrawal",
    ),
    TarotCard::new(
        3,
        "The Empress",
        Arcana::Major,
        "Femininity, beauty, nature, abundance, nurturing",
        "Creative block, dependence on others",
    ),
    TarotCard::new(
        4,
        "The Emperor",
        Arcana::Major,
        "Authority, establishment, structure, father figure",
        "Domination, excessive control, lack of discipline",
    ),
    TarotCard::new(
        5,
        "The Hierophant",
        Arcana::Major,
        "Spiritual wisdom, religious beliefs, conformity, tradition",
        "Personal beliefs, freedom, challenging the status quo",
    ),
    TarotCard::new(
        6,
        "The Lovers",
        Arcana::Major,
        "Love, harmony, relationships, values alignment, choices",
        "Self-love, disharmony, imbalance, misalignment",
    ),
    TarotCard::new(
        7,
        "The Chariot",
        Arcana::Major,
        "Control, willpower, success, action, determination",
        "Self-discipline, opposition, lack of direction",
    ),
    TarotCard::new(
        8,
        "Strength",
        Arcana::Major,
        "Strength, courage, persuasion, influence, compassion",
        "Inner strength, self-doubt, low energy, raw emotion",
    ),
    TarotCard::new(
        9,
        "The Hermit",
        Arcana::Major,
        "Soul-searching, introspection, being alone, inner guidance",
        "Isolation, loneliness, withdrawal",
    ),
    TarotCard::new(
        10,
        "Wheel of Fortune",
        Arcana::Major,
        "Good luck, karma, life cycles, destiny, turning point",
        "Bad luck, resistance to change, breaking cycles",
    ),
    TarotCard::new(
        11,
        "Justice",
        Arcana::Major,
        "Justice, fairness, truth, cause and effect, law",
        "Unfairness, lack of accountability, dishonesty",
    ),
    TarotCard::new(
        12,
        "The Hanged Man",
        Arcana::Major,
        "Pause, surrender, letting go, new perspectives",
        "Delays, resistance, stalling, indecision",
    ),
    TarotCard::new(
        13,
        "Death",
        Arcana::Major,
        "Endings, change, transformation, transition",
        "Resistance to change, personal transformation, inner purging",
    ),
    TarotCard::new(
        14,
        "Temperance",
        Arcana::Major,
        "Balance, moderation, patience, purpose",
        "Imbalance, excess, self-healing, re-alignment",
    ),
    TarotCard::new(
        15,
        "The Devil",
        Arcana::Major,
        "Shadow self, attachment, addiction, restriction, sexuality",
        "Releasing limiting beliefs, exploring dark thoughts, detachment",
    ),
    TarotCard::new(
        16,
        "The Tower",
        Arcana::Major,
        "Sudden change, upheaval, chaos, revelation, awakening",
        "Personal transformation, fear of change, averting disaster",
    ),
    TarotCard::new(
        17,
        "The Star",
        Arcana::Major,
        "Hope, faith, purpose, renewal, spirituality",
        "Lack of faith, despair, self-trust, disconnection",
    ),
    TarotCard::new(
        18,
        "The Moon",
        Arcana::Major,
        "Illusion, fear, anxiety, subconscious, intuition",
        "Release of fear, repressed emotion, inner confusion",
    ),
    TarotCard::new(
        19,
        "The Sun",
        Arcana::Major,
        "Positivity, fun, warmth, success, vitality",
        "Inner child, feeling down, overly optimistic",
    ),
    TarotCard::new(
        20,
        "Judgement",
        Arcana::Major,
        "Judgement, rebirth, inner calling, absolution",
        "Self-doubt, inner critic, ignoring the call",
    ),
    TarotCard::new(
        21,
        "The World",
        Arcana::Major,
        "Completion, accomplishment, travel, fulfillment",
        "Seeking personal closure, short-cut, delays",
    ),
    TarotCard::new(
        22,
        "Ace of Wands",
        Arcana::Minor(Suit::Wands),
        "Inspiration, new opportunities, growth, potential",
        "An emerging idea, lack of direction, distractions",
    ),
    TarotCard::new(
        23,
        "Two of Wands",
        Arcana::Minor(Suit::Wands),
        "Future planning, progress, decisions, discovery",
        "Personal goals, inner alignment, fear of unknown",
    ),
    TarotCard::new(
        24,
        "Three of Wands",
        Arcana::Minor(Suit::Wands),
        "Progress, expansion, foresight, overseas opportunities",
        "Playing small, lack of foresight, unexpected delays",
    ),
    TarotCard::new(
        25,
        "Four of Wands",
        Arcana::Minor(Suit::Wands),
        "Celebration, joy, harmony, relaxation, homecoming",
        "Personal celebration, inner harmony, conflict with others",
    ),
    TarotCard::new(
        26,
        "Five of Wands",
        Arcana::Minor(Suit::Wands),
        "Conflict, disagreements, competition, tension",
        "Inner conflict, conflict avoidance, release of tension",
    ),
    TarotCard::new(
        27,
        "Six of Wands",
        Arcana::Minor(Suit::Wands),
        "Success, public recognition, progress, self-confidence",
        "Private achievement, personal definition of success",
    ),
    TarotCard::new(
        28,
        "Seven of Wands",
        Arcana::Minor(Suit::Wands),
        "Challenge, competition, protection, perseverance",
        "Exhaustion, giving up, overwhelmed",
    ),
    TarotCard::new(
        29,
        "Eight of Wands",
        Arcana::Minor(Suit::Wands),
        "Movement, fast paced change, action, alignment",
        "Delays, frustration, resisting change, internal alignment",
    ),
    TarotCard::new(
        30,
        "Nine of Wands",
        Arcana::Minor(Suit::Wands),
        "Resilience, courage, persistence, test of faith",
        "Inner resources, struggle, overwhelm, defensive",
    ),
    TarotCard::new(
        31,
        "Ten of Wands",
        Arcana::Minor(Suit::Wands),
        "Burden, extra responsibility, hard work, completion",
        "Doing it all, carrying the burden, delegation",
    ),
    TarotCard::new(
        32,
        "Page of Wands",
        Arcana::Minor(Suit::Wands),
        "Inspiration, ideas, discovery, limitless potential",
        "Newly-formed ideas, redirecting energy, self-limiting beliefs",
    ),
    TarotCard::new(
        33,
        "Knight of Wands",
        Arcana::Minor(Suit::Wands),
        "Energy, passion, inspired action, adventure, impulsiveness",
        "Passion project, haste, scattered energy, delays",
    ),
    TarotCard::new(
        34,
        "Queen of Wands",
        Arcana::Minor(Suit::Wands),
        "Courage, confidence, independence, social butterfly",
        "Self-respect, self-confidence, introverted, re-establish",
    ),
    TarotCard::new(
        35,
        "King of Wands",
        Arcana::Minor(Suit::Wands),
        "Natural-born leader, vision, entrepreneur, honour",
        "Impulsiveness, haste, ruthless, high expectations",
    ),
    TarotCard::new(
        36,
        "Ace of Cups",
        Arcana::Minor(Suit::Cups),
        "Love, new relationships, compassion, creativity",
        "Self-love, intuition, repressed emotions",
    ),
    TarotCard::new(
        37,
        "Two of Cups",
        Arcana::Minor(Suit::Cups),
        "Unified love, partnership, mutual attraction",
        "Self-love, break-ups, disharmony, distrust",
    ),
    TarotCard::new(
        38,
        "Three of Cups",
        Arcana::Minor(Suit::Cups),
        "Celebration, friendship, creativity, collaborations",
        "Independence, alone time, hardcore partying",
    ),
    TarotCard::new(
        39,
        "Four of Cups",
        Arcana::Minor(Suit::Cups),
        "Meditation, contemplation, apathy, reevaluation",
        "Retreat, withdrawal, checking in for alignment",
    ),
    TarotCard::new(
        40,
        "Five of Cups",
        Arcana::Minor(Suit::Cups),
        "Regret, failure, disappointment, pessimism",
        "Personal setbacks, self-forgiveness, moving on",
    ),
    TarotCard::new(
        41,
        "Six of Cups",
        Arcana::Minor(Suit::Cups),
        "Revisiting the past, childhood memories, innocence",
        "Living in the past, forgiveness, lacking playfulness",
    ),
    TarotCard::new(
        42,
        "Seven of Cups",
        Arcana::Minor(Suit::Cups),
        "Opportunities, choices, wishful thinking, illusion",
        "Alignment, personal values, overwhelmed by choices",
    ),
    TarotCard::new(
        43,
        "Eight of Cups",
        Arcana::Minor(Suit::Cups),
        "Disappointment, abandonment, withdrawal, escapism",
        "Trying one more time, indecision, aimless drifting",
    ),
    TarotCard::new(
        44,
        "Nine of Cups",
        Arcana::Minor(Suit::Cups),
        "Contentment, satisfaction, gratitude, wish come true",
        "Inner happiness, materialism, dissatisfaction",
    ),
    TarotCard::new(
        45,
        "Ten of Cups",
        Arcana::Minor(Suit::Cups),
        "Divine love, blissful relationships, harmony, alignment",
        "Disconnection, misaligned values, struggling relationships",
    ),
    TarotCard::new(
        46,
        "Page of Cups",
        Arcana::Minor(Suit::Cups),
        "Creative opportunities, intuitive messages, curiosity",
        "New ideas, doubting intuition, creative blocks",
    ),
    TarotCard::new(
        47,
        "Knight of Cups",
        Arcana::Minor(Suit::Cups),
        "Creativity, romance, charm, imagination, beauty",
        "Overactive imagination, unrealistic, jealous, moody",
    ),
    TarotCard::new(
        48,
        "Queen of Cups",
        Arcana::Minor(Suit::Cups),
        "Compassionate, caring, emotionally stable, intuitive",
        "Inner feelings, self-care, self-love, co-dependency",
    ),
    TarotCard::new(
        49,
        "King of Cups",
        Arcana::Minor(Suit::Cups),
        "Emotionally balanced, compassionate, diplomatic",
        "Self-compassion, inner feelings, moodiness, emotionally manipulative",
    ),
    TarotCard::new(
        50,
        "Ace of Swords",
        Arcana::Minor(Suit::Swords),
        "Breakthroughs, new ideas, mental clarity, success",
        "Inner clarity, re-thinking an idea, clouded judgement",
    ),
    TarotCard::new(
        51,
        "Two of Swords",
        Arcana::Minor(Suit::Swords),
        "Difficult decisions, weighing up options, stalemate",
        "Indecision, confusion, information overload",
    ),
    TarotCard::new(
        52,
        "Three of Swords",
        Arcana::Minor(Suit::Swords),
        "Heartbreak, emotional pain, sorrow, grief, hurt",
        "Negative self-talk, releasing pain, optimism, forgiveness",
    ),
    TarotCard::new(
        53,
        "Four of Swords",
        Arcana::Minor(Suit::Swords),
        "Rest, relaxation, meditation, contemplation, recuperation",
        "Exhaustion, burn-out, deep contemplation, stagnation",
    ),
    TarotCard::new(
        54,
        "Five of Swords",
        Arcana::Minor(Suit::Swords),
        "Conflict, disagreements, competition, defeat, win at all costs",
        "Reconciliation, making amends, past resentment",
    ),
    TarotCard::new(
        55,
        "Six of Swords",
        Arcana::Minor(Suit::Swords),
        "Transition, change, rite of passage, releasing baggage",
        "Personal transition, resistance to change, unfinished business",
    ),
    TarotCard::new(
        56,
        "Seven of Swords",
        Arcana::Minor(Suit::Swords),
        "Betrayal, deception, getting away with something, stealth",
        "Imposter syndrome, self-deceit, keeping secrets",
    ),
    TarotCard::new(
        57,
        "Eight of Swords",
        Arcana::Minor(Suit::Swords),
        "Negative thoughts, self-imposed restriction, imprisonment",
        "Self-limiting beliefs, inner critic, releasing negative thoughts",
    ),
    TarotCard::new(
        58,
        "Nine of Swords",
        Arcana::Minor(Suit::Swords),
        "Anxiety, worry, fear, depression, nightmares",
        "Inner turmoil, deep-seated fears, secrets, releasing worry",
    ),
    TarotCard::new(
        59,
        "Ten of Swords",
        Arcana::Minor(Suit::Swords),
        "Painful endings, deep wounds, betrayal, loss, crisis",
        "Recovery, regeneration, resisting an inevitable end",
    ),
    TarotCard::new(
        60,
        "Page of Swords",
        Arcana::Minor(Suit::Swords),
        "New ideas, curiosity, thirst for knowledge, new ways",
        "Self-expression, all talk and no action, haphazard action",
    ),
    TarotCard::new(
        61,
        "Knight of Swords",
        Arcana::Minor(Suit::Swords),
        "Ambitious, action-oriented, driven to succeed, fast-thinking",
        "Restless, unfocused, impulsive, burn-out",
    ),
    TarotCard::new(
        62,
        "Queen of Swords",
        Arcana::Minor(Suit::Swords),
        "Independent, unbiased judgement, clear boundaries, direct",
        "Overly-emotional, easily influenced, bitchy, cold-hearted",
    ),
    TarotCard::new(
        63,
        "King of Swords",
        Arcana::Minor(Suit::Swords),
        "Mental clarity, intellectual power, authority, truth",
        "Quiet power, inner truth, misuse of power, manipulation",
    ),
    TarotCard::new(
        64,
        "Ace of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "A new financial or career opportunity, manifestation, abundance",
        "Lost opportunity, lack of planning and foresight",
    ),
    TarotCard::new(
        65,
        "Two of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Multiple priorities, time management, prioritisation, adaptability",
        "Over-committed, disorganisation, reprioritisation",
    ),
    TarotCard::new(
        66,
        "Three of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Teamwork, collaboration, learning, implementation",
        "Disharmony, misalignment, working alone",
    ),
    TarotCard::new(
        67,
        "Four of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Saving money, security, conservatism, scarcity, control",
        "Over-spending, greed, self-protection",
    ),
    TarotCard::new(
        68,
        "Five of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Financial loss, poverty, lack mindset, isolation, worry",
        "Recovery from financial loss, spiritual poverty",
    ),
    TarotCard::new(
        69,
        "Six of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Giving, receiving, sharing wealth, generosity, charity",
        "Self-care, unpaid debts, one-sided charity",
    ),
    TarotCard::new(
        70,
        "Seven of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Long-term view, sustainable results, perseverance, investment",
        "Lack of long-term vision, limited success or reward",
    ),
    TarotCard::new(
        71,
        "Eight of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Apprenticeship, repetitive tasks, mastery, skill development",
        "Self-development, perfectionism, misdirected activity",
    ),
    TarotCard::new(
        72,
        "Nine of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Abundance, luxury, self-sufficiency, financial independence",
        "Self-worth, over-investment in work, hustling",
    ),
    TarotCard::new(
        73,
        "Ten of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Wealth, financial security, family, long-term success, contribution",
        "The dark side of wealth, financial failure or loss",
    ),
    TarotCard::new(
        74,
        "Page of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Manifestation, financial opportunity, skill development",
        "Lack of progress, procrastination, learn from failure",
    ),
    TarotCard::new(
        75,
        "Knight of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Hard work, productivity, routine, conservatism",
        "Self-discipline, boredom, feeling 'stuck', perfectionism",
    ),
    TarotCard::new(
        76,
        "Queen of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Nurturing, practical, providing financially, grounded",
        "Financial independence, self-care, work-home conflict",
    ),
    TarotCard::new(
        77,
        "King of Pentacles",
        Arcana::Minor(Suit::Pentacles),
        "Wealth, business, leadership, security, discipline, abundance",
        "Financially inept, obsessed with wealth and status",
    ),
];

/// A card as dealt, with its orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnCard {
    pub card: &'static TarotCard,
    pub reversed: bool,
    pub revealed: bool,
}

impl DrawnCard {
    pub fn meaning(&self) -> &'static str {
        if self.reversed {
            self.card.reversed
        } else {
            self.card.upright
        }
    }

    pub fn orientation(&self) -> &'static str {
        if self.reversed {
            "Reversed"
        } else {
            "Upright"
        }
    }
}

/// Deck order as indices into `DECK`
pub fn shuffled(rng: &mut ChaCha20Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..DECK_SIZE).collect();
    order.shuffle(rng);
    order
}

/// Deal one card face down, reversed with probability one half
pub fn draw(index: usize, rng: &mut ChaCha20Rng) -> Option<DrawnCard> {
    let card = DECK.get(index)?;
    Some(DrawnCard {
        card,
        reversed: rng.gen_bool(0.5),
        revealed: false,
    })
}
