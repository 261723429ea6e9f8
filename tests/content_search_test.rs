use std::sync::Arc;

use tempfile::TempDir;

use otzar::{ContentIndex, CorpusIndex, IndexedDocument, SearchScope};

fn seed_index(dir: &TempDir) -> anyhow::Result<Arc<CorpusIndex>> {
    let index = CorpusIndex::create_in(dir.path())?;
    let mut writer = index.writer()?;

    writer.add(IndexedDocument::Line {
        book_id: 2,
        book_title: "בראשית".to_string(),
        category_id: 1,
        line_id: 10,
        line_index: 0,
        text_raw: "וַיֹּאמֶר אֱלֹהִים יְהִי אוֹר".to_string(),
    })?;
    writer.add(IndexedDocument::Line {
        book_id: 2,
        book_title: "בראשית".to_string(),
        category_id: 1,
        line_id: 11,
        line_index: 1,
        text_raw: "וַיְהִי־אוֹר".to_string(),
    })?;
    writer.add(IndexedDocument::Line {
        book_id: 2,
        book_title: "בראשית".to_string(),
        category_id: 1,
        line_id: 12,
        line_index: 2,
        text_raw: "יהי רקיע בתוך המים ויבדל אור".to_string(),
    })?;
    writer.add(IndexedDocument::Line {
        book_id: 5,
        book_title: "שמות".to_string(),
        category_id: 3,
        line_id: 20,
        line_index: 0,
        text_raw: "ואלה שמות בני ישראל".to_string(),
    })?;

    writer.commit()?;
    Ok(Arc::new(index))
}

#[test]
fn proximity_search_highlights_every_query_token() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let content = ContentIndex::new(seed_index(&dir)?);

    let hits = content.search("יהי אור", 5, SearchScope::All, 10, 0)?;
    let hit = hits
        .iter()
        .find(|h| h.line_id == 10)
        .expect("pointed line should match the bare query");
    assert_eq!(hit.book_id, 2);
    assert_eq!(hit.book_title, "בראשית");
    assert_eq!(hit.line_index, 0);
    assert!(hit.snippet.contains("<b>יְהִי</b>"));
    assert!(hit.snippet.contains("<b>אוֹר</b>"));
    Ok(())
}

#[test]
fn slop_bounds_token_distance() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let content = ContentIndex::new(seed_index(&dir)?);

    // Line 12 keeps four words between the two query tokens.
    let tight = content.search("יהי אור", 0, SearchScope::All, 10, 0)?;
    assert!(tight.iter().any(|h| h.line_id == 10));
    assert!(!tight.iter().any(|h| h.line_id == 12));

    let loose = content.search("יהי אור", 5, SearchScope::All, 10, 0)?;
    assert!(loose.iter().any(|h| h.line_id == 12));
    Ok(())
}

#[test]
fn maqaf_joined_words_index_as_separate_terms() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let content = ContentIndex::new(seed_index(&dir)?);

    let hits = content.search("ויהי אור", 0, SearchScope::All, 10, 0)?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].line_id, 11);
    Ok(())
}

#[test]
fn book_scope_filters_hits() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let content = ContentIndex::new(seed_index(&dir)?);

    let hits = content.search_in_book("אור", 0, 2, 10, 0)?;
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|h| h.book_id == 2));

    assert!(content.search_in_book("אור", 0, 5, 10, 0)?.is_empty());
    Ok(())
}

#[test]
fn category_without_matches_is_empty_not_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let content = ContentIndex::new(seed_index(&dir)?);

    assert!(content.search_in_category("שמות", 0, 7, 10, 0)?.is_empty());

    let hits = content.search_in_category("שמות", 0, 3, 10, 0)?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].line_id, 20);
    Ok(())
}

#[test]
fn single_token_query_matches_by_term() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let content = ContentIndex::new(seed_index(&dir)?);

    let hits = content.search("שמות", 0, SearchScope::All, 10, 0)?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].line_id, 20);
    assert!(hits[0].snippet.contains("<b>שמות</b>"));
    Ok(())
}

#[test]
fn offset_past_results_and_empty_query_return_empty() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let content = ContentIndex::new(seed_index(&dir)?);

    assert!(content.search("אור", 5, SearchScope::All, 10, 100)?.is_empty());
    assert!(content.search("", 5, SearchScope::All, 10, 0)?.is_empty());
    assert!(content.search("אור", 5, SearchScope::All, 0, 0)?.is_empty());
    Ok(())
}

#[test]
fn line_hits_serialize_for_transport() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let content = ContentIndex::new(seed_index(&dir)?);

    let hits = content.search("שמות", 0, SearchScope::All, 10, 0)?;
    let json = serde_json::to_string(&hits)?;
    assert!(json.contains("\"line_id\":20"));
    assert!(json.contains("\"book_title\""));
    Ok(())
}
