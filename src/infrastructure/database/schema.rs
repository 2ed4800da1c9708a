diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    documents (id) {
        id -> Uuid,
        title -> Text,
        storage_path -> Text,
        workspace_id -> Uuid,
        owner_id -> Uuid,
        status -> Varchar,
        error -> Nullable<Text>,
        metadata -> Nullable<Jsonb>,
        checksum -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    chunks (id) {
        id -> Uuid,
        document_id -> Uuid,
        chunk_index -> Int4,
        chunk_text -> Text,
        embedding -> Vector,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    queries (id) {
        id -> Uuid,
        workspace_id -> Uuid,
        user_id -> Uuid,
        question_text -> Text,
        model_used -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(chunks -> documents (document_id));

diesel::allow_tables_to_appear_in_same_query!(chunks, documents, queries);
