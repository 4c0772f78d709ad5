//! The single HTML page served at `/`.

pub(crate) const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>PPT Script Builder</title>
<link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css" rel="stylesheet">
<style>textarea{font-family:monospace}</style>
</head>
<body class="container mt-4">

<h3>PPT Script Builder</h3>

<form method="POST" action="/generate">
<textarea name="script" class="form-control mb-3" rows="10"
placeholder="Words = slides
[IMAGE src=https://example.com/image.png width=60%]
[MIX text=&quot;Hello&quot; src=https://example.com/image.png align=left]
[VIDEO src=https://example.com/video.mp4]
---
A second deck starts after three dashes"></textarea>
<button class="btn btn-success">Generate PPT</button>
</form>

<hr>

<h5>Host an image</h5>
<form id="upload" class="mb-2">
<input type="file" name="file" accept="image/*" class="form-control mb-2">
<button class="btn btn-secondary">Upload</button>
</form>
<code id="uploaded"></code>

<script>
document.getElementById("upload").onsubmit = async (event) => {
  event.preventDefault();
  const out = document.getElementById("uploaded");
  out.textContent = "Uploading...";
  const response = await fetch("/upload", { method: "POST", body: new FormData(event.target) });
  const body = await response.json();
  out.textContent = body.url ? `[IMAGE src=${body.url}]` : `Error: ${body.error}`;
};
</script>

</body>
</html>
"#;
