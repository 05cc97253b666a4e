//! Built-in controlled vocabularies, selected by field name.

use crate::validator::name_matches;

/// Vocabulary and alias table attached to a family of field names.
#[derive(Debug)]
pub struct BuiltinVocabulary {
    pub label: &'static str,
    thai_names: &'static [&'static str],
    english_names: &'static [&'static str],
    pub entries: &'static [&'static str],
    pub aliases: &'static [(&'static str, &'static str)],
}

impl BuiltinVocabulary {
    fn applies_to(&self, field_name: &str) -> bool {
        name_matches(field_name, self.thai_names, self.english_names)
    }
}

pub const THAI_PROVINCES: &[&str] = &[
    "กรุงเทพฯ", "กรุงเทพมหานคร", "กระบี่", "กาญจนบุรี", "กาฬสินธุ์", "กำแพงเพชร", "ขอนแก่น",
    "จันทบุรี", "ฉะเชิงเทรา", "ชลบุรี", "ชัยนาท", "ชัยภูมิ", "ชุมพร", "เชียงราย", "เชียงใหม่",
    "ตรัง", "ตราด", "ตาก", "นครนายก", "นครปฐม", "นครพนม", "นครราชสีมา", "นครศรีธรรมราช",
    "นครสวรรค์", "นนทบุรี", "นราธิวาส", "น่าน", "บึงกาฬ", "บุรีรัมย์", "ปทุมธานี",
    "ประจวบคีรีขันธ์", "ปราจีนบุรี", "ปัตตานี", "พระนครศรีอยุธยา", "พะเยา", "พังงา", "พัทลุง",
    "พิจิตร", "พิษณุโลก", "เพชรบุรี", "เพชรบูรณ์", "แพร่", "ภูเก็ต", "มหาสารคาม", "มุกดาหาร",
    "แม่ฮ่องสอน", "ยะลา", "ยโสธร", "ร้อยเอ็ด", "ระนอง", "ระยอง", "ราชบุรี", "ลพบุรี", "ลำปาง",
    "ลำพูน", "เลย", "ศรีสะเกษ", "สกลนคร", "สงขลา", "สตูล", "สมุทรปราการ", "สมุทรสงคราม",
    "สมุทรสาคร", "สระแก้ว", "สระบุรี", "สิงห์บุรี", "สุโขทัย", "สุพรรณบุรี", "สุราษฎร์ธานี",
    "สุรินทร์", "หนองคาย", "หนองบัวลำภู", "อ่างทอง", "อำนาจเจริญ", "อุดรธานี", "อุตรดิตถ์",
    "อุทัยธานี", "อุบลราชธานี",
];

/// Health regions used by the surveillance schema.
pub const THAI_REGIONS: &[&str] = &[
    "ภาคเหนือ",
    "ภาคกลางและตะวันตก",
    "ภาคตะวันออกเฉียงเหนือ",
    "ภาคตะวันออก",
    "ภาคใต้",
];

pub const GENDERS: &[&str] = &["ชาย", "หญิง", "ไม่ระบุ"];

pub const LIFE_STATUSES: &[&str] = &["เสียชีวิต", "รอดชีวิต", "ไม่ระบุ"];

const OCCUPATIONS: &[&str] = &[
    "เกษตรกร",
    "รับจ้าง",
    "พนักงานบริษัท",
    "ข้าราชการ",
    "ค้าขาย",
    "แม่บ้าน",
    "นักเรียน",
    "นักศึกษา",
    "พนักงานร้านอาหาร",
    "ช่างซ่อม",
    "คนขับรถ",
    "แรงงาน",
    "ผู้ประกอบการ",
    "วิศวกร",
    "ครู",
    "แพทย์",
    "พยาบาล",
    "ไม่ระบุ",
    "เร่ร่อน",
    "ว่างงาน",
    "เกษียณอายุ",
];

const PROVINCE_ALIASES: &[(&str, &str)] = &[
    ("กรุงเทพ", "กรุงเทพฯ"),
    ("กรุงเทพมหานคร", "กรุงเทพฯ"),
    ("bangkok", "กรุงเทพฯ"),
    ("bkk", "กรุงเทพฯ"),
    ("chonburi", "ชลบุรี"),
    ("chiangmai", "เชียงใหม่"),
    ("chiang mai", "เชียงใหม่"),
    ("phuket", "ภูเก็ต"),
    ("khon kaen", "ขอนแก่น"),
    ("korat", "นครราชสีมา"),
    ("nakhon ratchasima", "นครราชสีมา"),
    ("ubon ratchathani", "อุบลราชธานี"),
    ("ubon", "อุบลราชธานี"),
    ("udon thani", "อุดรธานี"),
    ("udon", "อุดรธานี"),
];

const REGION_ALIASES: &[(&str, &str)] = &[
    ("เหนือ", "ภาคเหนือ"),
    ("ใต้", "ภาคใต้"),
    ("อีสาน", "ภาคตะวันออกเฉียงเหนือ"),
    ("ตะวันออกเฉียงเหนือ", "ภาคตะวันออกเฉียงเหนือ"),
    ("กลาง", "ภาคกลางและตะวันตก"),
    ("ตะวันตก", "ภาคกลางและตะวันตก"),
    ("ภาคกลาง", "ภาคกลางและตะวันตก"),
    ("ภาคตะวันตก", "ภาคกลางและตะวันตก"),
    ("ตะวันออก", "ภาคตะวันออก"),
];

const GENDER_ALIASES: &[(&str, &str)] = &[
    ("male", "ชาย"),
    ("female", "หญิง"),
    ("man", "ชาย"),
    ("woman", "หญิง"),
    ("m", "ชาย"),
    ("f", "หญิง"),
    ("ผู้ชาย", "ชาย"),
    ("ผู้หญิง", "หญิง"),
    ("unknown", "ไม่ระบุ"),
    ("n/a", "ไม่ระบุ"),
    ("not specified", "ไม่ระบุ"),
];

const STATUS_ALIASES: &[(&str, &str)] = &[
    ("dead", "เสียชีวิต"),
    ("died", "เสียชีวิต"),
    ("deceased", "เสียชีวิต"),
    ("death", "เสียชีวิต"),
    ("alive", "รอดชีวิต"),
    ("survived", "รอดชีวิต"),
    ("living", "รอดชีวิต"),
    ("unknown", "ไม่ระบุ"),
];

/// Checked in order; the first family whose names match wins.
pub const BUILTIN_VOCABULARIES: &[BuiltinVocabulary] = &[
    BuiltinVocabulary {
        label: "province",
        thai_names: &["จังหวัด"],
        english_names: &["province"],
        entries: THAI_PROVINCES,
        aliases: PROVINCE_ALIASES,
    },
    BuiltinVocabulary {
        label: "region",
        thai_names: &["ภาค"],
        english_names: &["region"],
        entries: THAI_REGIONS,
        aliases: REGION_ALIASES,
    },
    BuiltinVocabulary {
        label: "gender",
        thai_names: &["เพศ"],
        english_names: &["gender", "sex"],
        entries: GENDERS,
        aliases: GENDER_ALIASES,
    },
    BuiltinVocabulary {
        label: "status",
        thai_names: &["สถานะ"],
        english_names: &["status"],
        entries: LIFE_STATUSES,
        aliases: STATUS_ALIASES,
    },
    BuiltinVocabulary {
        label: "month",
        thai_names: &["เดือน"],
        english_names: &["month"],
        entries: &crate::lexicon::THAI_MONTHS,
        aliases: &[],
    },
    BuiltinVocabulary {
        label: "occupation",
        thai_names: &["อาชีพ"],
        english_names: &["occupation"],
        entries: OCCUPATIONS,
        aliases: &[],
    },
];

/// Built-in vocabulary for a field name, if any.
pub fn builtin_for(field_name: &str) -> Option<&'static BuiltinVocabulary> {
    BUILTIN_VOCABULARIES
        .iter()
        .find(|vocabulary| vocabulary.applies_to(field_name))
}

/// Administrative prefixes stripped before matching, keyed by field name.
const PREFIXES: &[(&str, &[&str])] = &[
    ("จังหวัด", &["จังหวัด", "จ."]),
    ("อำเภอ", &["อำเภอ", "อ."]),
    ("ตำบล", &["ตำบล", "ต."]),
];

/// Prefixes to strip for a field name.
pub fn prefixes_for(field_name: &str) -> Vec<&'static str> {
    PREFIXES
        .iter()
        .filter(|(marker, _)| field_name.contains(marker))
        .flat_map(|(_, prefixes)| prefixes.iter().copied())
        .collect()
}
