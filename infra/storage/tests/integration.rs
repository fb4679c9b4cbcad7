use sbox_storage::*;
use tempfile::TempDir;

async fn setup(temp: &TempDir, compression: Compression) -> Storage {
    Storage::builder(temp.path()).compression(compression).connect().await.unwrap()
}

#[tokio::test]
async fn test_write_read_roundtrip_uncompressed() {
    let temp = TempDir::new().unwrap();
    let docs = setup(&temp, Compression::None).await.collection("docs").unwrap();

    docs.write("proj-1", b"hello world").await.unwrap();

    assert_eq!(docs.read("proj-1").await.unwrap().as_deref(), Some(&b"hello world"[..]));
}

#[tokio::test]
async fn test_write_read_roundtrip_compressed() {
    let temp = TempDir::new().unwrap();
    let docs = setup(&temp, Compression::Lz4).await.collection("docs").unwrap();

    let payload = vec![1u8; 4096];
    docs.write("bulk", &payload).await.unwrap();

    let on_disk = std::fs::metadata(docs.resolve("bulk").unwrap()).unwrap().len();
    assert!(on_disk < 4096, "document should be stored compressed");
    assert_eq!(docs.read("bulk").await.unwrap(), Some(payload));
}

#[tokio::test]
async fn test_read_missing_returns_none() {
    let temp = TempDir::new().unwrap();
    let docs = setup(&temp, Compression::None).await.collection("docs").unwrap();

    assert_eq!(docs.read("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_overwrite_replaces_document() {
    let temp = TempDir::new().unwrap();
    let docs = setup(&temp, Compression::None).await.collection("docs").unwrap();

    docs.write("k", b"first version, longer").await.unwrap();
    docs.write("k", b"second").await.unwrap();

    assert_eq!(docs.read("k").await.unwrap().as_deref(), Some(&b"second"[..]));
}

#[tokio::test]
async fn test_keys_are_case_sensitive() {
    let temp = TempDir::new().unwrap();
    let docs = setup(&temp, Compression::None).await.collection("docs").unwrap();

    for key in ["proj-b", "Proj-A", "proj-a"] {
        docs.write(key, key.as_bytes()).await.unwrap();
    }

    assert_eq!(docs.read("Proj-A").await.unwrap().as_deref(), Some(&b"Proj-A"[..]));
    assert_eq!(docs.read("proj-a").await.unwrap().as_deref(), Some(&b"proj-a"[..]));
    assert_ne!(docs.resolve("Proj-A").unwrap(), docs.resolve("proj-a").unwrap());
}

#[tokio::test]
async fn test_traversal_keys_stay_inside_collection() {
    let temp = TempDir::new().unwrap();
    let storage = setup(&temp, Compression::None).await;
    let docs = storage.collection("docs").unwrap();

    let path = docs.resolve("../../etc/passwd").unwrap();
    assert!(path.starts_with(storage.root().join("docs")));
    assert_eq!(path.parent(), Some(storage.root().join("docs").as_path()));
}

#[tokio::test]
async fn test_invalid_keys_are_rejected() {
    let temp = TempDir::new().unwrap();
    let docs = setup(&temp, Compression::None).await.collection("docs").unwrap();

    let too_long = "k".repeat(MAX_KEY_LEN + 1);
    for key in ["", too_long.as_str()] {
        assert!(matches!(docs.write(key, b"x").await, Err(StorageError::InvalidName { .. })));
    }
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let temp = TempDir::new().unwrap();
    let storage = setup(&temp, Compression::None).await;

    let a = storage.collection("alpha").unwrap();
    let b = storage.collection("beta").unwrap();
    a.write("same", b"a").await.unwrap();
    b.write("same", b"b").await.unwrap();

    assert_eq!(a.read("same").await.unwrap().as_deref(), Some(&b"a"[..]));
    assert_eq!(b.read("same").await.unwrap().as_deref(), Some(&b"b"[..]));
}

#[tokio::test]
async fn test_reconnect_sees_previous_documents() {
    let temp = TempDir::new().unwrap();
    setup(&temp, Compression::Lz4).await.collection("docs").unwrap().write("k", b"v").await.unwrap();

    let reopened = setup(&temp, Compression::Lz4).await.collection("docs").unwrap();
    assert_eq!(reopened.read("k").await.unwrap().as_deref(), Some(&b"v"[..]));
}

#[tokio::test]
async fn test_connect_without_create_requires_root() {
    let temp = TempDir::new().unwrap();
    let result = Storage::builder(temp.path().join("absent")).create(false).connect().await;

    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[tokio::test]
async fn test_connect_rejects_a_file_as_root() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain.txt");
    std::fs::write(&file, b"not a directory").unwrap();

    let result = Storage::builder(&file).create(false).connect().await;
    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_leave_a_whole_document() {
    let temp = TempDir::new().unwrap();
    let docs = setup(&temp, Compression::None).await.collection("docs").unwrap();

    let handles: Vec<_> = (0..16u8)
        .map(|i| {
            let docs = docs.clone();
            tokio::spawn(async move { docs.write("shared", &[i; 512]).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let data = docs.read("shared").await.unwrap().unwrap();
    assert_eq!(data.len(), 512);
    assert!(data.iter().all(|b| *b == data[0]), "document must come from a single writer");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_handles_on_one_root_do_not_collide() {
    let temp = TempDir::new().unwrap();
    let first = setup(&temp, Compression::None).await.collection("docs").unwrap();
    let second = setup(&temp, Compression::None).await.collection("docs").unwrap();

    let handles: Vec<_> = (0..16u8)
        .map(|i| {
            let docs = if i % 2 == 0 { first.clone() } else { second.clone() };
            tokio::spawn(async move { docs.write("shared", &[i; 256]).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let data = first.read("shared").await.unwrap().unwrap();
    assert!(data.iter().all(|b| *b == data[0]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_document_lock_spans_handles() {
    let temp = TempDir::new().unwrap();
    let first = setup(&temp, Compression::None).await.collection("docs").unwrap();
    let second = setup(&temp, Compression::None).await.collection("docs").unwrap();

    let handles: Vec<_> = (0..20u32)
        .map(|i| {
            let docs = if i % 2 == 0 { first.clone() } else { second.clone() };
            tokio::spawn(async move {
                let _lock = docs.lock("counter").await.unwrap();
                let current = match docs.read("counter").await.unwrap() {
                    Some(bytes) => u32::from_le_bytes(bytes.try_into().unwrap()),
                    None => 0,
                };
                tokio::task::yield_now().await;
                docs.write("counter", &(current + 1).to_le_bytes()).await.unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let bytes = first.read("counter").await.unwrap().unwrap();
    assert_eq!(u32::from_le_bytes(bytes.try_into().unwrap()), 20);
}

#[tokio::test]
async fn test_lock_is_released_on_drop() {
    let temp = TempDir::new().unwrap();
    let docs = setup(&temp, Compression::None).await.collection("docs").unwrap();

    drop(docs.lock("k").await.unwrap());
    let again = tokio::time::timeout(std::time::Duration::from_secs(5), docs.lock("k")).await;
    assert!(again.is_ok_and(|lock| lock.is_ok()));
    assert!(matches!(docs.lock("").await, Err(StorageError::InvalidName { .. })));
}
