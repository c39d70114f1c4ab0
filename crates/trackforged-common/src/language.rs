//! ISO 639 language code conversion.
//!
//! The metadata service reports a title's original language as an ISO 639-1
//! (two-letter) code while probe reports and library services use ISO 639-2
//! (three-letter) codes. Track tags mostly use the bibliographic (`/B`) form,
//! so that is what [`to_three_letter`] produces.

use crate::{Error, Result, ServiceKind};

/// One row of the ISO 639 table.
#[derive(Debug, Clone, Copy)]
pub struct LanguageEntry {
    /// ISO 639-1 code.
    pub alpha2: &'static str,
    /// ISO 639-2/B (bibliographic) code.
    pub bibliographic: &'static str,
    /// ISO 639-2/T (terminology) code.
    pub terminology: &'static str,
    /// English name.
    pub name: &'static str,
}

const fn entry(
    alpha2: &'static str,
    bibliographic: &'static str,
    terminology: &'static str,
    name: &'static str,
) -> LanguageEntry {
    LanguageEntry {
        alpha2,
        bibliographic,
        terminology,
        name,
    }
}

#[rustfmt::skip]
static LANGUAGES: &[LanguageEntry] = &[
    entry("aa", "aar", "aar", "Afar"),
    entry("ab", "abk", "abk", "Abkhazian"),
    entry("ae", "ave", "ave", "Avestan"),
    entry("af", "afr", "afr", "Afrikaans"),
    entry("ak", "aka", "aka", "Akan"),
    entry("am", "amh", "amh", "Amharic"),
    entry("an", "arg", "arg", "Aragonese"),
    entry("ar", "ara", "ara", "Arabic"),
    entry("as", "asm", "asm", "Assamese"),
    entry("av", "ava", "ava", "Avaric"),
    entry("ay", "aym", "aym", "Aymara"),
    entry("az", "aze", "aze", "Azerbaijani"),
    entry("ba", "bak", "bak", "Bashkir"),
    entry("be", "bel", "bel", "Belarusian"),
    entry("bg", "bul", "bul", "Bulgarian"),
    entry("bi", "bis", "bis", "Bislama"),
    entry("bm", "bam", "bam", "Bambara"),
    entry("bn", "ben", "ben", "Bengali"),
    entry("bo", "tib", "bod", "Tibetan"),
    entry("br", "bre", "bre", "Breton"),
    entry("bs", "bos", "bos", "Bosnian"),
    entry("ca", "cat", "cat", "Catalan"),
    entry("ce", "che", "che", "Chechen"),
    entry("ch", "cha", "cha", "Chamorro"),
    entry("co", "cos", "cos", "Corsican"),
    entry("cr", "cre", "cre", "Cree"),
    entry("cs", "cze", "ces", "Czech"),
    entry("cu", "chu", "chu", "Church Slavic"),
    entry("cv", "chv", "chv", "Chuvash"),
    entry("cy", "wel", "cym", "Welsh"),
    entry("da", "dan", "dan", "Danish"),
    entry("de", "ger", "deu", "German"),
    entry("dv", "div", "div", "Divehi"),
    entry("dz", "dzo", "dzo", "Dzongkha"),
    entry("ee", "ewe", "ewe", "Ewe"),
    entry("el", "gre", "ell", "Greek"),
    entry("en", "eng", "eng", "English"),
    entry("eo", "epo", "epo", "Esperanto"),
    entry("es", "spa", "spa", "Spanish"),
    entry("et", "est", "est", "Estonian"),
    entry("eu", "baq", "eus", "Basque"),
    entry("fa", "per", "fas", "Persian"),
    entry("ff", "ful", "ful", "Fulah"),
    entry("fi", "fin", "fin", "Finnish"),
    entry("fj", "fij", "fij", "Fijian"),
    entry("fo", "fao", "fao", "Faroese"),
    entry("fr", "fre", "fra", "French"),
    entry("fy", "fry", "fry", "Western Frisian"),
    entry("ga", "gle", "gle", "Irish"),
    entry("gd", "gla", "gla", "Gaelic"),
    entry("gl", "glg", "glg", "Galician"),
    entry("gn", "grn", "grn", "Guarani"),
    entry("gu", "guj", "guj", "Gujarati"),
    entry("gv", "glv", "glv", "Manx"),
    entry("ha", "hau", "hau", "Hausa"),
    entry("he", "heb", "heb", "Hebrew"),
    entry("hi", "hin", "hin", "Hindi"),
    entry("ho", "hmo", "hmo", "Hiri Motu"),
    entry("hr", "hrv", "hrv", "Croatian"),
    entry("ht", "hat", "hat", "Haitian"),
    entry("hu", "hun", "hun", "Hungarian"),
    entry("hy", "arm", "hye", "Armenian"),
    entry("hz", "her", "her", "Herero"),
    entry("ia", "ina", "ina", "Interlingua"),
    entry("id", "ind", "ind", "Indonesian"),
    entry("ie", "ile", "ile", "Interlingue"),
    entry("ig", "ibo", "ibo", "Igbo"),
    entry("ii", "iii", "iii", "Sichuan Yi"),
    entry("ik", "ipk", "ipk", "Inupiaq"),
    entry("io", "ido", "ido", "Ido"),
    entry("is", "ice", "isl", "Icelandic"),
    entry("it", "ita", "ita", "Italian"),
    entry("iu", "iku", "iku", "Inuktitut"),
    entry("ja", "jpn", "jpn", "Japanese"),
    entry("jv", "jav", "jav", "Javanese"),
    entry("ka", "geo", "kat", "Georgian"),
    entry("kg", "kon", "kon", "Kongo"),
    entry("ki", "kik", "kik", "Kikuyu"),
    entry("kj", "kua", "kua", "Kuanyama"),
    entry("kk", "kaz", "kaz", "Kazakh"),
    entry("kl", "kal", "kal", "Kalaallisut"),
    entry("km", "khm", "khm", "Central Khmer"),
    entry("kn", "kan", "kan", "Kannada"),
    entry("ko", "kor", "kor", "Korean"),
    entry("kr", "kau", "kau", "Kanuri"),
    entry("ks", "kas", "kas", "Kashmiri"),
    entry("ku", "kur", "kur", "Kurdish"),
    entry("kv", "kom", "kom", "Komi"),
    entry("kw", "cor", "cor", "Cornish"),
    entry("ky", "kir", "kir", "Kirghiz"),
    entry("la", "lat", "lat", "Latin"),
    entry("lb", "ltz", "ltz", "Luxembourgish"),
    entry("lg", "lug", "lug", "Ganda"),
    entry("li", "lim", "lim", "Limburgan"),
    entry("ln", "lin", "lin", "Lingala"),
    entry("lo", "lao", "lao", "Lao"),
    entry("lt", "lit", "lit", "Lithuanian"),
    entry("lu", "lub", "lub", "Luba-Katanga"),
    entry("lv", "lav", "lav", "Latvian"),
    entry("mg", "mlg", "mlg", "Malagasy"),
    entry("mh", "mah", "mah", "Marshallese"),
    entry("mi", "mao", "mri", "Maori"),
    entry("mk", "mac", "mkd", "Macedonian"),
    entry("ml", "mal", "mal", "Malayalam"),
    entry("mn", "mon", "mon", "Mongolian"),
    entry("mr", "mar", "mar", "Marathi"),
    entry("ms", "may", "msa", "Malay"),
    entry("mt", "mlt", "mlt", "Maltese"),
    entry("my", "bur", "mya", "Burmese"),
    entry("na", "nau", "nau", "Nauru"),
    entry("nb", "nob", "nob", "Norwegian Bokmål"),
    entry("nd", "nde", "nde", "North Ndebele"),
    entry("ne", "nep", "nep", "Nepali"),
    entry("ng", "ndo", "ndo", "Ndonga"),
    entry("nl", "dut", "nld", "Dutch"),
    entry("nn", "nno", "nno", "Norwegian Nynorsk"),
    entry("no", "nor", "nor", "Norwegian"),
    entry("nr", "nbl", "nbl", "South Ndebele"),
    entry("nv", "nav", "nav", "Navajo"),
    entry("ny", "nya", "nya", "Chichewa"),
    entry("oc", "oci", "oci", "Occitan"),
    entry("oj", "oji", "oji", "Ojibwa"),
    entry("om", "orm", "orm", "Oromo"),
    entry("or", "ori", "ori", "Oriya"),
    entry("os", "oss", "oss", "Ossetian"),
    entry("pa", "pan", "pan", "Punjabi"),
    entry("pi", "pli", "pli", "Pali"),
    entry("pl", "pol", "pol", "Polish"),
    entry("ps", "pus", "pus", "Pashto"),
    entry("pt", "por", "por", "Portuguese"),
    entry("qu", "que", "que", "Quechua"),
    entry("rm", "roh", "roh", "Romansh"),
    entry("rn", "run", "run", "Rundi"),
    entry("ro", "rum", "ron", "Romanian"),
    entry("ru", "rus", "rus", "Russian"),
    entry("rw", "kin", "kin", "Kinyarwanda"),
    entry("sa", "san", "san", "Sanskrit"),
    entry("sc", "srd", "srd", "Sardinian"),
    entry("sd", "snd", "snd", "Sindhi"),
    entry("se", "sme", "sme", "Northern Sami"),
    entry("sg", "sag", "sag", "Sango"),
    entry("si", "sin", "sin", "Sinhala"),
    entry("sk", "slo", "slk", "Slovak"),
    entry("sl", "slv", "slv", "Slovenian"),
    entry("sm", "smo", "smo", "Samoan"),
    entry("sn", "sna", "sna", "Shona"),
    entry("so", "som", "som", "Somali"),
    entry("sq", "alb", "sqi", "Albanian"),
    entry("sr", "srp", "srp", "Serbian"),
    entry("ss", "ssw", "ssw", "Swati"),
    entry("st", "sot", "sot", "Southern Sotho"),
    entry("su", "sun", "sun", "Sundanese"),
    entry("sv", "swe", "swe", "Swedish"),
    entry("sw", "swa", "swa", "Swahili"),
    entry("ta", "tam", "tam", "Tamil"),
    entry("te", "tel", "tel", "Telugu"),
    entry("tg", "tgk", "tgk", "Tajik"),
    entry("th", "tha", "tha", "Thai"),
    entry("ti", "tir", "tir", "Tigrinya"),
    entry("tk", "tuk", "tuk", "Turkmen"),
    entry("tl", "tgl", "tgl", "Tagalog"),
    entry("tn", "tsn", "tsn", "Tswana"),
    entry("to", "ton", "ton", "Tonga"),
    entry("tr", "tur", "tur", "Turkish"),
    entry("ts", "tso", "tso", "Tsonga"),
    entry("tt", "tat", "tat", "Tatar"),
    entry("tw", "twi", "twi", "Twi"),
    entry("ty", "tah", "tah", "Tahitian"),
    entry("ug", "uig", "uig", "Uighur"),
    entry("uk", "ukr", "ukr", "Ukrainian"),
    entry("ur", "urd", "urd", "Urdu"),
    entry("uz", "uzb", "uzb", "Uzbek"),
    entry("ve", "ven", "ven", "Venda"),
    entry("vi", "vie", "vie", "Vietnamese"),
    entry("vo", "vol", "vol", "Volapük"),
    entry("wa", "wln", "wln", "Walloon"),
    entry("wo", "wol", "wol", "Wolof"),
    entry("xh", "xho", "xho", "Xhosa"),
    entry("yi", "yid", "yid", "Yiddish"),
    entry("yo", "yor", "yor", "Yoruba"),
    entry("za", "zha", "zha", "Zhuang"),
    entry("zh", "chi", "zho", "Chinese"),
    entry("zu", "zul", "zul", "Zulu"),
];

/// Look up a table row by any of its codes (case-insensitive).
pub fn lookup(code: &str) -> Option<&'static LanguageEntry> {
    let code = code.trim().to_ascii_lowercase();
    LANGUAGES.iter().find(|e| {
        e.alpha2 == code || e.bibliographic == code || e.terminology == code
    })
}

/// Convert an ISO 639-1 code to its ISO 639-2/B equivalent.
///
/// Fails with [`Error::Conversion`] when the code is not a known two-letter
/// code. Callers are expected to recover by using the input unchanged.
pub fn to_three_letter(code: &str) -> Result<String> {
    let normalized = code.trim().to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|e| e.alpha2 == normalized)
        .map(|e| e.bibliographic.to_string())
        .ok_or_else(|| Error::conversion(code))
}

/// Convert to three letters, or return the input unchanged when unknown.
pub fn to_three_letter_or_keep(code: &str) -> String {
    to_three_letter(code).unwrap_or_else(|_| code.trim().to_ascii_lowercase())
}

/// Apply the provider-specific override table to a track language tag.
///
/// Radarr reports Chinese as `chi` where the metadata service uses `cn`;
/// Sonarr has no overrides. Unmapped codes pass through unchanged.
pub fn map_provider_language(code: &str, provider: ServiceKind) -> String {
    let mapped = match (provider, code) {
        (ServiceKind::Radarr, "chi") => Some("cn"),
        _ => None,
    };
    mapped.unwrap_or(code).to_string()
}

/// English display name for a two- or three-letter code.
///
/// Unknown codes are returned as-is so they still read sensibly in logs.
pub fn display_name(code: &str) -> String {
    match lookup(code) {
        Some(entry) => entry.name.to_string(),
        None => code.to_string(),
    }
}

/// True when two codes name the same language (`fre` == `fra` == `fr`).
pub fn same_language(a: &str, b: &str) -> bool {
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    match (lookup(a), lookup(b)) {
        (Some(x), Some(y)) => x.alpha2 == y.alpha2,
        _ => false,
    }
}
