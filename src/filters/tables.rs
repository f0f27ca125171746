//! Filter lookup tables.
//!
//! Each table maps the user-facing choice name to the query fragment the
//! listing page understands. Fragments may contain spaces; the compiler
//! encodes them.

pub const SORTING: &[(&str, &str)] = &[
    ("relevance_highest", "order=m"),
    ("price_from_lowest", "order=p"),
    ("price_from_highest", "order=pd"),
    ("price_with_delivery_from_lowest", "order=d"),
    ("price_with_delivery_from_highest", "order=dd"),
    ("popularity_highest", "order=qd"),
    ("time_to_end_least", "order=t"),
    ("time_added_latest", "order=n"),
];

pub const SMART_FREE_SHIPPING: &str = "allegro-smart-standard=1";

pub const PRODUCT_CONDITION: &[(&str, &str)] = &[
    ("new", "stan=nowe"),
    ("used", "stan=używane"),
    ("incomplete_set", "stan=niekompletny zestaw"),
    ("new_without_tags", "stan=nowe bez metki"),
    ("new_with_defect", "stan=nowe z defektem"),
    ("after_return", "stan=po zwrocie"),
    ("aftermarket", "stan=powystawowy"),
    ("regenerated", "stan=regenerowany"),
    ("damaged", "stan=uszkodzony"),
    ("refurbished", "stan=odnowiony"),
    ("for_renovation", "stan=do renowacji"),
    ("not_requiring_renovation", "stan=nie wymaga renowacji"),
];

pub const OFFER_TYPE: &[(&str, &str)] = &[
    ("buy_now", "offerTypeBuyNow=1"),
    ("auction", "offerTypeAuction=2"),
    ("advertisement", "offerTypeAdvert=1"),
];

pub const PRICE_MIN_PARAM: &str = "price_from";
pub const PRICE_MAX_PARAM: &str = "price_to";

pub const DELIVERY_TIME: &[(&str, &str)] = &[
    ("today", "deliveryTime=today"),
    ("one_day", "deliveryTime=oneDay"),
    ("two_day", "deliveryTime=twoDays"),
];

pub const DELIVERY_METHODS: &[(&str, &str)] = &[
    ("courier", "deliveryMethod=kurier"),
    ("inpost_parcel_locker", "deliveryMethod=paczkomaty inpost"),
    ("overseas_delivery", "deliveryMethod=wysyłka za granicę"),
    ("pickup_at_the_point", "deliveryMethod=odbiór w punkcie"),
    ("letter", "deliveryMethod=list"),
    ("package", "deliveryMethod=paczka"),
    ("pickup", "deliveryMethod=odbiór osobisty"),
    ("email", "deliveryMethod=e-mail"),
];

pub const DELIVERY_OPTIONS: &[(&str, &str)] = &[
    ("free_shipping", "freeShipping=1"),
    ("free_return", "freeReturn=1"),
];

pub const CITY_PARAM: &str = "city";

pub const VOIVODESHIP: &[(&str, &str)] = &[
    ("dolnośląskie", "state=1"),
    ("kujawsko_pomorskie", "state=2"),
    ("lubelskie", "state=3"),
    ("lubuskie", "state=4"),
    ("łódzkie", "state=5"),
    ("małopolskie", "state=6"),
    ("mazowieckie", "state=7"),
    ("opolskie", "state=8"),
    ("podkarpackie", "state=9"),
    ("podlaskie", "state=10"),
    ("pomorskie", "state=11"),
    ("śląskie", "state=12"),
    ("świętokrzyskie", "state=13"),
    ("warmińsko_mazurskie", "state=14"),
    ("wielkopolskie", "state=15"),
    ("zachodniopomorskie", "state=16"),
];

pub const PRODUCT_RATING: &[(&str, &str)] = &[
    ("from4.9", "rating=4.9"),
    ("from4.8", "rating=4.8"),
    ("from4.5", "rating=4.5"),
];

pub const VAT_INVOICE: &str = "vat_invoice=1";

pub const ALLEGRO_PROGRAMS: &[(&str, &str)] = &[
    ("allegro_coins", "allegro-coins=1"),
    ("brand_zone", "brand-zone=1"),
    ("great_seller", "super-sprzedawca=1"),
    ("allegro_charity", "allegro-charytatywni=1"),
];

pub const OCCASIONS: &[(&str, &str)] = &[
    ("installments_of_zero_percent", "raty-zero-procent=1"),
    ("opportunity_zone", "strefa-okazji=1"),
    ("great_price", "super-cena=1"),
];
