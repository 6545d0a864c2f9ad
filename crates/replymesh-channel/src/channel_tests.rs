use super::*;

#[tokio::test]
async fn request_gets_its_own_response() {
    let (page, mut worker) = channel(8);

    let echo = tokio::spawn(async move {
        while let Some(incoming) = worker.recv().await {
            let kind = incoming.request.kind().to_string();
            incoming.responder.respond(PageResponse::reply_err(kind, false));
        }
    });

    let response = page.request(PageRequest::GetUsage).await.unwrap();
    match response {
        PageResponse::Reply { error, .. } => assert_eq!(error.as_deref(), Some("GET_USAGE")),
        other => panic!("unexpected response: {:?}", other),
    }

    drop(page);
    echo.await.unwrap();
}

#[tokio::test]
async fn responses_are_correlated_not_ordered() {
    let (page, mut worker) = channel(8);

    // Answer the two queued requests in reverse arrival order.
    let worker_task = tokio::spawn(async move {
        let first = worker.recv().await.unwrap();
        let second = worker.recv().await.unwrap();
        second
            .responder
            .respond(PageResponse::reply_ok("second", 2));
        first.responder.respond(PageResponse::reply_ok("first", 1));
    });

    let page_a = page.clone();
    let a = tokio::spawn(async move {
        page_a
            .request(PageRequest::GenerateReply {
                post_text: "first post".to_string(),
                author_name: None,
                post_date: None,
            })
            .await
            .unwrap()
    });
    let page_b = page.clone();
    let b = tokio::spawn(async move {
        // Give request A a head start so arrival order is deterministic.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        page_b
            .request(PageRequest::GenerateReply {
                post_text: "second post".to_string(),
                author_name: None,
                post_date: None,
            })
            .await
            .unwrap()
    });

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    match a {
        PageResponse::Reply { reply, .. } => assert_eq!(reply.as_deref(), Some("first")),
        other => panic!("unexpected response: {:?}", other),
    }
    match b {
        PageResponse::Reply { reply, .. } => assert_eq!(reply.as_deref(), Some("second")),
        other => panic!("unexpected response: {:?}", other),
    }
    worker_task.await.unwrap();
}

#[tokio::test]
async fn dead_worker_is_not_delivered() {
    let (page, worker) = channel(8);
    drop(worker);

    let err = page.request(PageRequest::GetSettings).await.unwrap_err();
    assert_eq!(err, replymesh_protocols::error::ChannelError::NotDelivered);
}

#[tokio::test]
async fn dropped_responder_is_disconnected() {
    let (page, mut worker) = channel(8);

    tokio::spawn(async move {
        let incoming = worker.recv().await.unwrap();
        drop(incoming.responder);
    });

    let err = page.request(PageRequest::GetSettings).await.unwrap_err();
    assert_eq!(err, replymesh_protocols::error::ChannelError::Disconnected);
}

#[tokio::test]
async fn worker_recv_ends_when_pages_are_gone() {
    let (page, mut worker) = channel(8);
    drop(page);
    assert!(worker.recv().await.is_none());
}
