diesel::table! {
    artists (id) {
        id -> Integer,
        name -> Text,
        city -> Text,
        state -> Text,
        phone -> Nullable<Text>,
        genres -> Text,
        image_link -> Nullable<Text>,
        facebook_link -> Nullable<Text>,
        website -> Nullable<Text>,
        seeking_venue -> Bool,
        seeking_description -> Nullable<Text>,
    }
}

diesel::table! {
    shows (id) {
        id -> Integer,
        start_time -> Timestamp,
        venue_id -> Integer,
        artist_id -> Integer,
    }
}

diesel::table! {
    venues (id) {
        id -> Integer,
        name -> Text,
        city -> Text,
        state -> Text,
        address -> Text,
        phone -> Nullable<Text>,
        image_link -> Nullable<Text>,
        facebook_link -> Nullable<Text>,
        genres -> Text,
        website -> Nullable<Text>,
        seeking_talent -> Bool,
        seeking_description -> Nullable<Text>,
    }
}

diesel::joinable!(shows -> artists (artist_id));
diesel::joinable!(shows -> venues (venue_id));

diesel::allow_tables_to_appear_in_same_query!(artists, shows, venues);
