use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::current_session;

/// Displays the login screen, or the photo frame once signed in.
pub async fn index(headers: HeaderMap) -> Response {
    match current_session(&headers).await {
        Some((_, session)) => Html(frame_page(&session.profile.name)).into_response(),
        None => Html(LOGIN_PAGE.to_string()).into_response(),
    }
}

pub async fn search_page(headers: HeaderMap) -> Response {
    render_if_authenticated(&headers, SEARCH_PAGE).await
}

pub async fn album_page(headers: HeaderMap) -> Response {
    render_if_authenticated(&headers, ALBUM_PAGE).await
}

/// Renders the given page if the user is authenticated, otherwise
/// redirects to "/".
async fn render_if_authenticated(headers: &HeaderMap, page: &str) -> Response {
    if current_session(headers).await.is_some() {
        Html(page.to_string()).into_response()
    } else {
        Redirect::to("/").into_response()
    }
}

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Photo Frame</title></head>
<body>
  <h2>Photo Frame</h2>
  <p><a href="/auth/google">Sign in with Google</a></p>
</body>
</html>"#;

fn frame_page(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Photo Frame</title></head>
<body>
  <h2>Photo Frame</h2>
  <p>Signed in as {name} &mdash; <a href="/search">search</a> &middot; <a href="/album">albums</a> &middot; <a href="/logout">log out</a></p>
  <div id="frame"></div>
  <script>
    fetch('/getQueue').then(r => r.json()).then(data => {{
      const frame = document.getElementById('frame');
      if (!data.mediaItems || !data.mediaItems.length) {{
        frame.textContent = 'Nothing loaded yet. Pick photos from search or an album.';
        return;
      }}
      for (const item of data.mediaItems) {{
        if (!item.baseUrl) continue;
        const img = document.createElement('img');
        img.src = item.baseUrl + '=w256-h256';
        img.loading = 'lazy';
        frame.appendChild(img);
      }}
    }});
  </script>
</body>
</html>"#
    )
}

const SEARCH_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Photo Frame - Search</title></head>
<body>
  <h2>Load photos from search</h2>
  <form id="search">
    <label>Include category <input name="includedCategories" placeholder="LANDSCAPES"></label><br>
    <label>Exclude category <input name="excludedCategories"></label><br>
    <label>Date filter
      <select name="dateFilter">
        <option value="">none</option>
        <option value="exact">exact</option>
        <option value="range">range</option>
      </select>
    </label><br>
    <fieldset><legend>Exact</legend>
      <input name="exactYear" size="4" placeholder="year">
      <input name="exactMonth" size="2" placeholder="mm">
      <input name="exactDay" size="2" placeholder="dd">
    </fieldset>
    <fieldset><legend>Range</legend>
      <input name="startYear" size="4" placeholder="year">
      <input name="startMonth" size="2" placeholder="mm">
      <input name="startDay" size="2" placeholder="dd">
      &ndash;
      <input name="endYear" size="4" placeholder="year">
      <input name="endMonth" size="2" placeholder="mm">
      <input name="endDay" size="2" placeholder="dd">
    </fieldset>
    <button type="submit">Load into frame</button>
  </form>
  <script>
    document.getElementById('search').addEventListener('submit', async (event) => {
      event.preventDefault();
      const body = new URLSearchParams(new FormData(event.target));
      const response = await fetch('/loadFromSearch', {method: 'POST', body});
      if (response.ok) { window.location = '/'; }
      else { alert((await response.json()).message); }
    });
  </script>
</body>
</html>"#;

const ALBUM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Photo Frame - Albums</title></head>
<body>
  <h2>Load photos from an album</h2>
  <div id="albums">Loading albums&hellip;</div>
  <script>
    async function loadAlbum(albumId) {
      const body = new URLSearchParams({albumId});
      const response = await fetch('/loadFromAlbum', {method: 'POST', body});
      if (response.ok) { window.location = '/'; }
      else { alert((await response.json()).message); }
    }
    fetch('/getAlbums').then(r => r.json()).then(data => {
      const list = document.getElementById('albums');
      list.textContent = '';
      if (!data.albums || !data.albums.length) {
        list.textContent = 'No albums found.';
        return;
      }
      for (const album of data.albums) {
        const button = document.createElement('button');
        button.textContent = (album.title || album.id) +
          (album.mediaItemsCount ? ' (' + album.mediaItemsCount + ')' : '');
        button.addEventListener('click', () => loadAlbum(album.id));
        list.appendChild(button);
      }
    });
  </script>
</body>
</html>"#;
