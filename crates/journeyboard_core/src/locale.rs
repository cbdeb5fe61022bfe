//! Locale tags and the fixed translation tables the core depends on.
//!
//! # Responsibility
//! - Parse and serialize the two supported language tags.
//! - Provide the narrow `Translator` seam used by seed factories and labels.
//!
//! # Invariants
//! - Seed factories receive `Locale` explicitly; nothing here reads ambient state.
//! - Unknown translation keys resolve to the key itself.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Supported UI languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ru,
}

impl Locale {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLocale(pub String);

impl Display for UnsupportedLocale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported locale `{}`; expected en|ru", self.0)
    }
}

impl Error for UnsupportedLocale {}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    /// Accepts `en`, `RU`, `ru-RU`, `en_US`, ...
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let language = value
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            _ => Err(UnsupportedLocale(value.to_string())),
        }
    }
}

/// Narrow translation interface consumed by the core.
pub trait Translator {
    fn translate(&self, key: &str) -> String;
    fn current_locale(&self) -> Locale;
}

/// Translator backed by the compiled-in tables below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticTranslator {
    locale: Locale,
}

impl StaticTranslator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl Translator for StaticTranslator {
    fn translate(&self, key: &str) -> String {
        lookup(self.locale, key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    fn current_locale(&self) -> Locale {
        self.locale
    }
}

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_RU: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

// Sunday first, matching the calendar grid.
const WEEKDAYS_SHORT_EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAYS_SHORT_RU: [&str; 7] = ["Вс", "Пн", "Вт", "Ср", "Чт", "Пт", "Сб"];
const WEEKDAYS_EN: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const WEEKDAYS_RU: [&str; 7] = [
    "Воскресенье",
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
];

/// Month names, January first.
pub fn month_names(locale: Locale) -> &'static [&'static str; 12] {
    match locale {
        Locale::En => &MONTHS_EN,
        Locale::Ru => &MONTHS_RU,
    }
}

/// Weekday names, Sunday first.
pub fn weekday_names(locale: Locale, short: bool) -> &'static [&'static str; 7] {
    match (locale, short) {
        (Locale::En, true) => &WEEKDAYS_SHORT_EN,
        (Locale::En, false) => &WEEKDAYS_EN,
        (Locale::Ru, true) => &WEEKDAYS_SHORT_RU,
        (Locale::Ru, false) => &WEEKDAYS_RU,
    }
}

/// Localized exercise name for a canonical English name.
///
/// Names without a translation are returned unchanged.
pub fn exercise_name(locale: Locale, english: &str) -> String {
    if locale == Locale::En {
        return english.to_string();
    }
    let translated = match english {
        "Bench Press" => "Жим лежа",
        "Incline Dumbbell Press" => "Жим гантелей на наклонной скамье",
        "Cable Flyes" => "Разводка на тросах",
        "Squats" => "Приседания",
        "Leg Press" => "Жим ногами",
        "Leg Extensions" => "Разгибание ног",
        "Pull-ups" => "Подтягивания",
        "Barbell Rows" => "Тяга штанги в наклоне",
        "Lat Pulldowns" => "Тяга верхнего блока",
        "Overhead Press" => "Жим штанги над головой",
        "Lateral Raises" => "Разведение рук с гантелями",
        "Face Pulls" => "Тяга к лицу",
        "Deadlifts" => "Становая тяга",
        "Romanian Deadlifts" => "Румынская становая тяга",
        "Leg Curls" => "Сгибание ног",
        other => other,
    };
    translated.to_string()
}

/// Short numeric date: `DD.MM.YYYY` for `ru`, `M/D/YYYY` for `en`.
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::Ru => format!("{:02}.{:02}.{}", date.day(), date.month(), date.year()),
        Locale::En => format!("{}/{}/{}", date.month(), date.day(), date.year()),
    }
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    let value = match (locale, key) {
        (Locale::En, "progress.today") => "Today",
        (Locale::Ru, "progress.today") => "Сегодня",
        (Locale::En, "fitness.units.weight") => "lbs",
        (Locale::Ru, "fitness.units.weight") => "кг",
        (Locale::En, "fitness.units.calories") => "kcal",
        (Locale::Ru, "fitness.units.calories") => "ккал",

        (Locale::En, "ideas.categories.idea") => "Idea",
        (Locale::En, "ideas.categories.goal") => "Goal",
        (Locale::En, "ideas.categories.quote") => "Quote",
        (Locale::En, "ideas.categories.reflection") => "Reflection",
        (Locale::En, "ideas.categories.gratitude") => "Gratitude",
        (Locale::Ru, "ideas.categories.idea") => "Идея",
        (Locale::Ru, "ideas.categories.goal") => "Цель",
        (Locale::Ru, "ideas.categories.quote") => "Цитата",
        (Locale::Ru, "ideas.categories.reflection") => "Размышление",
        (Locale::Ru, "ideas.categories.gratitude") => "Благодарность",

        (Locale::En, "ideas.colors.tiffanyBlue") => "Tiffany Blue",
        (Locale::En, "ideas.colors.red") => "Red",
        (Locale::En, "ideas.colors.yellow") => "Yellow",
        (Locale::En, "ideas.colors.purple") => "Purple",
        (Locale::En, "ideas.colors.green") => "Green",
        (Locale::Ru, "ideas.colors.tiffanyBlue") => "Тиффани",
        (Locale::Ru, "ideas.colors.red") => "Красный",
        (Locale::Ru, "ideas.colors.yellow") => "Желтый",
        (Locale::Ru, "ideas.colors.purple") => "Фиолетовый",
        (Locale::Ru, "ideas.colors.green") => "Зеленый",

        (Locale::En, "vision.items.camry.title") => "Toyota Camry",
        (Locale::En, "vision.items.apple.title") => "Apple Ecosystem",
        (Locale::En, "vision.items.physique.title") => "Athletic Physique",
        (Locale::En, "vision.items.youtube.title") => "YouTube Channel",
        (Locale::En, "vision.items.gifts.title") => "Gifts for Family",
        (Locale::En, "vision.items.hajj.title") => "Hajj",
        (Locale::En, "vision.items.home.title") => "Own Home",
        (Locale::En, "vision.items.audi.title") => "Audi",
        (Locale::Ru, "vision.items.camry.title") => "Toyota Camry",
        (Locale::Ru, "vision.items.apple.title") => "Экосистема Apple",
        (Locale::Ru, "vision.items.physique.title") => "Атлетичное тело",
        (Locale::Ru, "vision.items.youtube.title") => "YouTube-канал",
        (Locale::Ru, "vision.items.gifts.title") => "Подарки для семьи",
        (Locale::Ru, "vision.items.hajj.title") => "Хадж",
        (Locale::Ru, "vision.items.home.title") => "Собственный дом",
        (Locale::Ru, "vision.items.audi.title") => "Audi",
        _ => return None,
    };
    Some(value)
}
