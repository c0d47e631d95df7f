use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Atelier - AI Image Generator</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; max-width: 860px; }
    h1 { margin-bottom: 0.5rem; }
    nav a { margin-right: 1rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input, textarea, select { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    textarea { resize: vertical; min-height: 4rem; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }
    .grid img { width: 100%; border-radius: 6px; }
    .status { margin-top: 0.75rem; color: #555; }
    .error { color: #b00020; }
  </style>
</head>
<body>
  <h1>Atelier</h1>
  <nav><a href="/">Generate</a><a href="/gallery">Gallery</a></nav>
  <p>Describe an image, pick a model, and generate. Results land in the gallery.</p>

  <div class="card">
    <form id="imageForm">
      <label for="prompt">Prompt</label>
      <textarea id="prompt" placeholder="a red fox in the snow" required></textarea>
      <label for="model">Model</label>
      <select id="model"><option value="">Loading models...</option></select>
      <label for="size">Size</label>
      <select id="size">
        <option value="1024x1024" selected>1024x1024</option>
        <option value="512x512">512x512</option>
        <option value="256x256">256x256</option>
      </select>
      <label for="quality">Quality</label>
      <select id="quality">
        <option value="standard" selected>Standard</option>
        <option value="hd">HD</option>
      </select>
      <button id="generateBtn" type="submit">Generate</button>
    </form>
    <div id="status" class="status"></div>
  </div>

  <div class="card">
    <h2>Results</h2>
    <div id="results" class="grid"></div>
  </div>

  <script>
    const form = document.getElementById('imageForm');
    const status = document.getElementById('status');
    const results = document.getElementById('results');
    const modelSelect = document.getElementById('model');

    async function loadModels() {
      try {
        const res = await fetch('/api/models');
        const data = await res.json();
        modelSelect.innerHTML = '';
        if (data.data && data.data.length > 0) {
          data.data.forEach(model => {
            const option = document.createElement('option');
            option.value = model.id;
            option.textContent = model.tier ? `${model.id} (${model.tier})` : model.id;
            modelSelect.appendChild(option);
          });
          modelSelect.value = data.data[0].id;
        } else {
          modelSelect.innerHTML = '<option value="">No models available</option>';
        }
      } catch (err) {
        modelSelect.innerHTML = '<option value="">Error loading models</option>';
      }
    }

    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      const payload = {
        prompt: document.getElementById('prompt').value,
        model: modelSelect.value || 'img3',
        size: document.getElementById('size').value,
        quality: document.getElementById('quality').value
      };
      status.textContent = 'Generating...';
      status.classList.remove('error');
      try {
        const res = await fetch('/api/generate', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(payload)
        });
        const json = await res.json();
        if (!res.ok) {
          status.textContent = json.error || 'Generation failed';
          status.classList.add('error');
          return;
        }
        status.textContent = json.message;
        json.images.forEach(img => {
          const el = document.createElement('img');
          el.src = img.url;
          el.alt = img.prompt;
          el.title = `${img.filename} (${img.storage})`;
          results.prepend(el);
        });
      } catch (err) {
        status.textContent = 'Generation failed';
        status.classList.add('error');
      }
    });

    loadModels();
  </script>
</body>
</html>"#)
}
